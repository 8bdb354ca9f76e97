//! Leaderboard queries and rank snapshots.
//!
//! Standings are summed from the points ledger on every call; ranking itself
//! is the pure [`hall_core::leaderboard::rank`].

use chrono::{DateTime, Utc};

use hall_core::enums::LeaderboardPeriod;
use hall_core::leaderboard::{RankSnapshot, Standing, period_start, rank, snapshot_of};
use hall_core::responses::LeaderboardResponse;

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, fmt_ts};
use crate::service::HallService;

fn row_to_standing(row: &libsql::Row) -> Result<Standing, DatabaseError> {
    Ok(Standing {
        user_id: row.get(0)?,
        display_name: row.get(1)?,
        points: row.get(2)?,
    })
}

impl HallService {
    /// Points per member of a group since `since`. Members without points
    /// appear with zero.
    pub async fn group_standings(
        &self,
        group_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Standing>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                "SELECT m.user_id, p.display_name, COALESCE(SUM(pt.amount), 0)
                 FROM group_members m
                 JOIN profiles p ON p.id = m.user_id
                 LEFT JOIN points pt ON pt.user_id = m.user_id AND pt.group_id = m.group_id
                      AND (?2 IS NULL OR pt.created_at >= ?2)
                 WHERE m.group_id = ?1
                 GROUP BY m.user_id, p.display_name",
                libsql::params![group_id, since.map(fmt_ts)],
            )
            .await?;
        collect_rows(rows, row_to_standing).await
    }

    /// Points per profile across all groups since `since`.
    pub async fn global_standings(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Standing>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                "SELECT p.id, p.display_name, COALESCE(SUM(pt.amount), 0)
                 FROM profiles p
                 LEFT JOIN points pt ON pt.user_id = p.id
                      AND (?1 IS NULL OR pt.created_at >= ?1)
                 GROUP BY p.id, p.display_name",
                libsql::params![since.map(fmt_ts)],
            )
            .await?;
        collect_rows(rows, row_to_standing).await
    }

    /// Ranked leaderboard for a group, or global when `group_id` is `None`.
    pub async fn leaderboard(
        &self,
        group_id: Option<&str>,
        period: LeaderboardPeriod,
        now: DateTime<Utc>,
        limit: Option<u32>,
    ) -> Result<LeaderboardResponse, DatabaseError> {
        let since = period_start(period, now);
        let standings = match group_id {
            Some(group_id) => {
                self.get_group(group_id).await?;
                self.group_standings(group_id, since).await?
            }
            None => self.global_standings(since).await?,
        };
        let mut entries = rank(standings);
        if let Some(limit) = limit {
            entries.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(LeaderboardResponse {
            group_id: group_id.map(String::from),
            period,
            entries,
        })
    }

    /// Ranks last stored for a group by `check_leaderboard_changes`.
    pub async fn load_rank_snapshot(
        &self,
        group_id: &str,
    ) -> Result<Vec<RankSnapshot>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                "SELECT user_id, rank, points FROM leaderboard_snapshots
                 WHERE group_id = ?1 ORDER BY rank",
                [group_id],
            )
            .await?;
        collect_rows(rows, |row| {
            Ok(RankSnapshot {
                user_id: row.get(0)?,
                rank: u32::try_from(row.get::<i64>(1)?)
                    .map_err(|e| DatabaseError::Query(format!("invalid stored rank: {e}")))?,
                points: row.get(2)?,
            })
        })
        .await
    }

    /// Replace a group's stored ranks with `entries`.
    pub async fn replace_rank_snapshot(
        &self,
        group_id: &str,
        entries: &[hall_core::leaderboard::LeaderboardEntry],
        now: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let _guard = self.write_guard().await;
        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "DELETE FROM leaderboard_snapshots WHERE group_id = ?1",
            [group_id],
        )
        .await?;
        for snap in snapshot_of(entries) {
            tx.execute(
                "INSERT INTO leaderboard_snapshots (group_id, user_id, rank, points, taken_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    group_id,
                    snap.user_id.as_str(),
                    i64::from(snap.rank),
                    snap.points,
                    fmt_ts(now)
                ],
            )
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
