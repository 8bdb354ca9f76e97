//! Detect rank changes since the last check and notify affected users.

use chrono::{DateTime, Utc};

use hall_core::enums::{LeaderboardPeriod, NotificationKind, RankMovement};
use hall_core::leaderboard::diff_rankings;
use hall_core::responses::{GroupRankChanges, LeaderboardChangesResponse};

use crate::error::DatabaseError;
use crate::jobs::failed;
use crate::repos::notification::NewNotification;
use crate::service::HallService;

impl HallService {
    /// Compare each group's all-time ranking with its stored snapshot.
    ///
    /// Users who now have more people strictly ahead of them get
    /// `rank_dropped`; when someone passes the previous leader's points every
    /// member gets `new_leader`. The first check of a group only
    /// records a baseline. The snapshot is replaced afterwards.
    ///
    /// With `group_id` set only that group is checked and its errors are
    /// returned; otherwise every group is checked best effort.
    pub async fn check_leaderboard_changes(
        &self,
        group_id: Option<&str>,
    ) -> Result<LeaderboardChangesResponse, DatabaseError> {
        let now = Utc::now();
        let mut response = LeaderboardChangesResponse::default();

        if let Some(group_id) = group_id {
            response
                .groups
                .push(self.check_group_ranks(group_id, now).await?);
            return Ok(response);
        }

        for id in self.list_group_ids().await? {
            match self.check_group_ranks(&id, now).await {
                Ok(changes) => response.groups.push(changes),
                Err(e) => {
                    tracing::warn!(group = %id, error = %e, "leaderboard check failed");
                    response.failed.push(failed(&id, &e));
                }
            }
        }
        Ok(response)
    }

    async fn check_group_ranks(
        &self,
        group_id: &str,
        now: DateTime<Utc>,
    ) -> Result<GroupRankChanges, DatabaseError> {
        let group = self.get_group(group_id).await?;
        let board = self
            .leaderboard(Some(group_id), LeaderboardPeriod::AllTime, now, None)
            .await?;
        let previous = self.load_rank_snapshot(group_id).await?;
        let mut sent = 0;

        let changes: Vec<_> = diff_rankings(&previous, &board.entries)
            .into_iter()
            .filter(|c| c.movement != RankMovement::Same)
            .collect();

        if !previous.is_empty() {
            for change in changes.iter().filter(|c| c.movement == RankMovement::Down) {
                let title = format!("You dropped to #{} in {}", change.current_rank, group.name);
                self.create_notification(
                    &change.user_id,
                    &NewNotification {
                        kind: NotificationKind::RankDropped,
                        title: &title,
                        body: None,
                        reference_id: Some(group_id),
                    },
                )
                .await?;
                sent += 1;
            }

            let old_leader = previous.iter().find(|s| s.rank == 1).map(|s| s.user_id.as_str());
            let old_leader_points = old_leader.map_or(0, |id| {
                board
                    .entries
                    .iter()
                    .find(|e| e.user_id == id)
                    .map_or(0, |e| e.points)
            });
            if let Some(leader) = board.entries.first() {
                // A tie at the top is not a takeover.
                if leader.points > old_leader_points && old_leader != Some(leader.user_id.as_str()) {
                    let title = format!("{} now leads {}", leader.display_name, group.name);
                    sent += self
                        .notify_group(
                            group_id,
                            None,
                            &NewNotification {
                                kind: NotificationKind::NewLeader,
                                title: &title,
                                body: None,
                                reference_id: Some(group_id),
                            },
                        )
                        .await?;
                }
            }
        }

        self.replace_rank_snapshot(group_id, &board.entries, now).await?;
        tracing::debug!(group = group_id, changes = changes.len(), sent, "ranks checked");
        Ok(GroupRankChanges {
            group_id: group_id.to_string(),
            changes,
            notifications_sent: sent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{group_with, profile, test_service};
    use crate::updates::profile::ProfileUpdateBuilder;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn first_check_records_baseline_silently() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let bo = profile(&svc, "Bo").await;
        let g = group_with(&svc, &ada, &[&bo]).await;

        let resp = svc.check_leaderboard_changes(Some(&g.id)).await.unwrap();
        assert_eq!(resp.groups[0].notifications_sent, 0);
        assert!(
            resp.groups[0]
                .changes
                .iter()
                .all(|c| c.movement == RankMovement::New)
        );
        assert_eq!(svc.load_rank_snapshot(&g.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn overtaking_notifies_drop_and_new_leader() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let bo = profile(&svc, "Bo").await;
        let g = group_with(&svc, &ada, &[&bo]).await;

        svc.log_study_session(&ada.id, Some(&g.id), None, 10, None).await.unwrap();
        svc.check_leaderboard_changes(Some(&g.id)).await.unwrap();
        svc.mark_all_notifications_read(&ada.id).await.unwrap();
        svc.mark_all_notifications_read(&bo.id).await.unwrap();

        svc.log_study_session(&bo.id, Some(&g.id), None, 30, None).await.unwrap();
        let resp = svc.check_leaderboard_changes(None).await.unwrap();
        let group = &resp.groups[0];
        // Ada: rank_dropped + new_leader. Bo: new_leader.
        assert_eq!(group.notifications_sent, 3);

        let ada_kinds: Vec<_> = svc
            .list_notifications(&ada.id, true, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.kind)
            .collect();
        assert!(ada_kinds.contains(&NotificationKind::RankDropped));
        assert!(ada_kinds.contains(&NotificationKind::NewLeader));

        let again = svc.check_leaderboard_changes(Some(&g.id)).await.unwrap();
        assert!(again.groups[0].changes.is_empty());
        assert_eq!(again.groups[0].notifications_sent, 0);
    }

    #[tokio::test]
    async fn joins_and_renames_at_equal_points_notify_nobody() {
        let svc = test_service().await;
        let bo = profile(&svc, "Bo").await;
        let cy = profile(&svc, "Cy").await;
        let g = group_with(&svc, &bo, &[&cy]).await;
        svc.check_leaderboard_changes(Some(&g.id)).await.unwrap();

        let aaron = profile(&svc, "Aaron").await;
        svc.join_group(&aaron.id, &g.invite_code).await.unwrap();
        let resp = svc.check_leaderboard_changes(Some(&g.id)).await.unwrap();
        let group = &resp.groups[0];
        assert_eq!(group.notifications_sent, 0);
        let moved: Vec<_> = group
            .changes
            .iter()
            .map(|c| (c.display_name.as_str(), c.movement))
            .collect();
        assert_eq!(moved, vec![("Aaron", RankMovement::New)]);

        svc.update_profile(&cy.id, ProfileUpdateBuilder::new().display_name("Abe").build())
            .await
            .unwrap();
        let resp = svc.check_leaderboard_changes(Some(&g.id)).await.unwrap();
        assert_eq!(resp.groups[0].notifications_sent, 0);
        assert!(resp.groups[0].changes.is_empty());
        assert_eq!(svc.unread_notification_count(&bo.id).await.unwrap(), 0);
        assert_eq!(svc.unread_notification_count(&cy.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn tied_leaders_swapping_order_is_not_a_takeover() {
        let svc = test_service().await;
        let amy = profile(&svc, "Amy").await;
        let zed = profile(&svc, "Zed").await;
        let g = group_with(&svc, &amy, &[&zed]).await;
        svc.log_study_session(&amy.id, Some(&g.id), None, 10, None).await.unwrap();
        svc.log_study_session(&zed.id, Some(&g.id), None, 10, None).await.unwrap();
        svc.check_leaderboard_changes(Some(&g.id)).await.unwrap();

        svc.update_profile(&amy.id, ProfileUpdateBuilder::new().display_name("Zoe").build())
            .await
            .unwrap();
        let resp = svc.check_leaderboard_changes(Some(&g.id)).await.unwrap();
        assert_eq!(resp.groups[0].notifications_sent, 0);
    }

    #[tokio::test]
    async fn unknown_group_is_an_error() {
        let svc = test_service().await;
        assert!(matches!(
            svc.check_leaderboard_changes(Some("grp-missing")).await,
            Err(DatabaseError::NoResult)
        ));
    }
}
