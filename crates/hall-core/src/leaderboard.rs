//! Leaderboard ranking and rank-change detection.
//!
//! Rankings are recomputed from the points ledger on every request. Users are
//! sorted by points descending; ties fall back to display name and then user
//! ID so the order is stable across calls. Rank is the 1-based position in
//! that order.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{LeaderboardPeriod, RankMovement};

/// Aggregated points for one user, before ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Standing {
    pub user_id: String,
    pub display_name: String,
    pub points: i64,
}

/// A ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: String,
    pub display_name: String,
    pub points: i64,
}

/// A previously observed rank, as stored in a leaderboard snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RankSnapshot {
    pub user_id: String,
    pub rank: u32,
    pub points: i64,
}

/// How one user's position changed between two observations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RankChange {
    pub user_id: String,
    pub display_name: String,
    pub previous_rank: Option<u32>,
    pub current_rank: u32,
    pub movement: RankMovement,
}

/// Sort standings by points descending and assign ranks by position.
#[must_use]
pub fn rank(mut standings: Vec<Standing>) -> Vec<LeaderboardEntry> {
    standings.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| a.display_name.cmp(&b.display_name))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    standings
        .into_iter()
        .zip(1u32..)
        .map(|(s, rank)| LeaderboardEntry {
            rank,
            user_id: s.user_id,
            display_name: s.display_name,
            points: s.points,
        })
        .collect()
}

/// Compare a stored snapshot with a fresh ranking.
///
/// Returns one change per user in `current`, in rank order. Users that only
/// appear in `previous` (e.g. left the group) are ignored.
///
/// Movement compares standings, the number of users with strictly more
/// points, rather than list positions. Tie-break order alone (a zero-point
/// member joining, a rename) never moves anyone up or down.
#[must_use]
pub fn diff_rankings(previous: &[RankSnapshot], current: &[LeaderboardEntry]) -> Vec<RankChange> {
    let before: HashMap<&str, &RankSnapshot> = previous
        .iter()
        .map(|s| (s.user_id.as_str(), s))
        .collect();
    let previous_points: Vec<i64> = previous.iter().map(|s| s.points).collect();
    let current_points: Vec<i64> = current.iter().map(|e| e.points).collect();

    current
        .iter()
        .map(|entry| {
            let prior = before.get(entry.user_id.as_str());
            let movement = match prior {
                None => RankMovement::New,
                Some(snap) => {
                    let ahead_before = users_ahead(snap.points, &previous_points);
                    let ahead_now = users_ahead(entry.points, &current_points);
                    match ahead_now.cmp(&ahead_before) {
                        Ordering::Less => RankMovement::Up,
                        Ordering::Greater => RankMovement::Down,
                        Ordering::Equal => RankMovement::Same,
                    }
                }
            };
            RankChange {
                user_id: entry.user_id.clone(),
                display_name: entry.display_name.clone(),
                previous_rank: prior.map(|s| s.rank),
                current_rank: entry.rank,
                movement,
            }
        })
        .collect()
}

fn users_ahead(points: i64, pool: &[i64]) -> usize {
    pool.iter().filter(|&&p| p > points).count()
}

/// Convert a ranking into the snapshot rows that will be stored.
#[must_use]
pub fn snapshot_of(entries: &[LeaderboardEntry]) -> Vec<RankSnapshot> {
    entries
        .iter()
        .map(|e| RankSnapshot {
            user_id: e.user_id.clone(),
            rank: e.rank,
            points: e.points,
        })
        .collect()
}

/// Lower bound of the period's window. `None` means all time.
///
/// Week and month are rolling windows of 7 and 30 days.
#[must_use]
pub fn period_start(period: LeaderboardPeriod, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match period {
        LeaderboardPeriod::AllTime => None,
        LeaderboardPeriod::Week => Some(now - Duration::days(7)),
        LeaderboardPeriod::Month => Some(now - Duration::days(30)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn standing(id: &str, name: &str, points: i64) -> Standing {
        Standing {
            user_id: id.into(),
            display_name: name.into(),
            points,
        }
    }

    #[test]
    fn sorts_descending_and_ranks_by_index() {
        let ranked = rank(vec![
            standing("usr-1", "Ada", 10),
            standing("usr-2", "Bo", 40),
            standing("usr-3", "Cy", 25),
        ]);
        let order: Vec<_> = ranked.iter().map(|e| (e.rank, e.user_id.as_str())).collect();
        assert_eq!(order, vec![(1, "usr-2"), (2, "usr-3"), (3, "usr-1")]);
    }

    #[test]
    fn rank_strictly_increases_as_points_descend() {
        let ranked = rank(vec![
            standing("usr-1", "A", 5),
            standing("usr-2", "B", 5),
            standing("usr-3", "C", 0),
            standing("usr-4", "D", 99),
        ]);
        for pair in ranked.windows(2) {
            assert!(pair[0].rank < pair[1].rank);
            assert!(pair[0].points >= pair[1].points);
        }
    }

    #[test]
    fn ties_break_on_name_then_id() {
        let ranked = rank(vec![
            standing("usr-b", "Same", 7),
            standing("usr-a", "Same", 7),
            standing("usr-c", "Alpha", 7),
        ]);
        let ids: Vec<_> = ranked.iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(ids, vec!["usr-c", "usr-a", "usr-b"]);
    }

    #[test]
    fn empty_input_yields_empty_board() {
        assert!(rank(Vec::new()).is_empty());
    }

    #[test]
    fn diff_reports_movement() {
        let previous = vec![
            RankSnapshot {
                user_id: "usr-1".into(),
                rank: 1,
                points: 30,
            },
            RankSnapshot {
                user_id: "usr-2".into(),
                rank: 2,
                points: 20,
            },
            RankSnapshot {
                user_id: "usr-gone".into(),
                rank: 3,
                points: 5,
            },
        ];
        let current = rank(vec![
            standing("usr-1", "Ada", 30),
            standing("usr-2", "Bo", 50),
            standing("usr-3", "Cy", 1),
        ]);

        let changes = diff_rankings(&previous, &current);
        let summary: Vec<_> = changes
            .iter()
            .map(|c| (c.user_id.as_str(), c.previous_rank, c.current_rank, c.movement))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("usr-2", Some(2), 1, RankMovement::Up),
                ("usr-1", Some(1), 2, RankMovement::Down),
                ("usr-3", None, 3, RankMovement::New),
            ]
        );
    }

    #[test]
    fn tie_order_changes_are_not_movement() {
        let previous = snapshot_of(&rank(vec![
            standing("usr-b", "Bo", 0),
            standing("usr-c", "Cy", 0),
        ]));
        let current = rank(vec![
            standing("usr-a", "Aaron", 0),
            standing("usr-b", "Bo", 0),
            standing("usr-c", "Cy", 0),
        ]);

        let movements: Vec<_> = diff_rankings(&previous, &current)
            .into_iter()
            .map(|c| (c.user_id, c.movement))
            .collect();
        assert_eq!(
            movements,
            vec![
                ("usr-a".to_string(), RankMovement::New),
                ("usr-b".to_string(), RankMovement::Same),
                ("usr-c".to_string(), RankMovement::Same),
            ]
        );
    }

    #[test]
    fn snapshot_round_trips_ranks() {
        let current = rank(vec![standing("usr-1", "Ada", 3)]);
        let snap = snapshot_of(&current);
        let changes = diff_rankings(&snap, &current);
        assert_eq!(changes[0].movement, RankMovement::Same);
    }

    #[test]
    fn period_windows() {
        let now = Utc::now();
        assert_eq!(period_start(LeaderboardPeriod::AllTime, now), None);
        assert_eq!(
            period_start(LeaderboardPeriod::Week, now),
            Some(now - Duration::days(7))
        );
        assert_eq!(
            period_start(LeaderboardPeriod::Month, now),
            Some(now - Duration::days(30))
        );
    }
}
