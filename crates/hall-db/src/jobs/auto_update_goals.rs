//! Credit a completed study session to matching time goals.

use chrono::Utc;

use hall_core::enums::SessionStatus;
use hall_core::responses::{AutoUpdateGoalsResponse, GoalProgressResponse};

use crate::error::DatabaseError;
use crate::jobs::failed;
use crate::service::HallService;

impl HallService {
    /// Apply a completed session's minutes to every active `time` goal it
    /// counts toward.
    ///
    /// Goals are taken from the session's group, or from every group the
    /// user belongs to when the session has none, and must have no subject
    /// or the session's subject. Each goal is updated in its own
    /// transaction. A session is credited at most once; later calls return
    /// an empty result. A call that fails before any goal is touched leaves
    /// the session uncredited.
    pub async fn auto_update_goals(
        &self,
        session_id: &str,
    ) -> Result<AutoUpdateGoalsResponse, DatabaseError> {
        let session = self.get_study_session(session_id).await?;
        if session.status != SessionStatus::Completed {
            return Err(DatabaseError::InvalidState(format!(
                "session {session_id} is {}, not completed",
                session.status
            )));
        }

        let mut response = AutoUpdateGoalsResponse {
            session_id: session.id.clone(),
            minutes: session.duration_minutes,
            ..AutoUpdateGoalsResponse::default()
        };
        if session.duration_minutes <= 0 {
            return Ok(response);
        }

        let group_ids = match session.group_id {
            Some(ref group_id) => vec![group_id.clone()],
            None => self
                .list_groups_for_user(&session.user_id, u32::MAX)
                .await?
                .into_iter()
                .map(|g| g.id)
                .collect(),
        };
        let goals = self
            .matching_time_goals(&group_ids, session.subject_id.as_deref())
            .await?;
        // Claimed after the goal lookup; a failed lookup leaves the session uncredited.
        if !self.claim_session_for_goals(&session.id, Utc::now()).await? {
            tracing::info!(session = session_id, "session already credited to goals");
            return Ok(response);
        }

        for goal in goals {
            match self
                .apply_goal_delta(&goal.id, &session.user_id, session.duration_minutes, false)
                .await
            {
                Ok(outcome) => {
                    if outcome.step.completed {
                        if let Err(e) = self.notify_goal_completed(&outcome.goal).await {
                            tracing::warn!(goal = %goal.id, error = %e, "completion notice failed");
                        }
                    }
                    response.updated.push(GoalProgressResponse {
                        goal: outcome.goal,
                        applied: outcome.step.applied,
                        points_awarded: outcome.points_awarded,
                        completed: outcome.step.completed,
                        achievements: Vec::new(),
                    });
                }
                Err(e) => {
                    tracing::warn!(goal = %goal.id, session = session_id, error = %e, "goal update failed");
                    response.failed.push(failed(&goal.id, &e));
                }
            }
        }

        tracing::info!(
            session = session_id,
            updated = response.updated.len(),
            failed = response.failed.len(),
            "auto-update-goals finished"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::goal::NewGoal;
    use crate::test_support::helpers::{group_with, profile, test_service};
    use hall_core::enums::{GoalStatus, GoalUnit, NotificationKind};
    use pretty_assertions::assert_eq;

    fn goal(unit: GoalUnit, target: i64, subject_id: Option<String>) -> NewGoal {
        NewGoal {
            title: format!("{unit} goal"),
            unit,
            target,
            subject_id,
            deadline: None,
        }
    }

    #[tokio::test]
    async fn credits_only_matching_time_goals() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let g = group_with(&svc, &ada, &[]).await;
        let algebra = svc.create_subject(&ada.id, &g.id, "Algebra", None).await.unwrap();
        let physics = svc.create_subject(&ada.id, &g.id, "Physics", None).await.unwrap();

        let any_subject = svc.create_goal(&ada.id, &g.id, goal(GoalUnit::Time, 120, None)).await.unwrap();
        let same_subject = svc
            .create_goal(&ada.id, &g.id, goal(GoalUnit::Time, 20, Some(algebra.id.clone())))
            .await
            .unwrap();
        let other_subject = svc
            .create_goal(&ada.id, &g.id, goal(GoalUnit::Time, 60, Some(physics.id.clone())))
            .await
            .unwrap();
        let pages = svc.create_goal(&ada.id, &g.id, goal(GoalUnit::Pages, 60, None)).await.unwrap();

        let done = svc
            .log_study_session(&ada.id, Some(&g.id), Some(&algebra.id), 30, None)
            .await
            .unwrap();
        let mut updated: Vec<_> = done
            .goals
            .updated
            .iter()
            .map(|u| (u.goal.id.clone(), u.applied, u.completed))
            .collect();
        updated.sort();
        let mut expected = vec![
            (any_subject.id.clone(), 30, false),
            (same_subject.id.clone(), 20, true),
        ];
        expected.sort();
        assert_eq!(updated, expected);

        assert_eq!(svc.get_goal(&other_subject.id).await.unwrap().progress, 0);
        assert_eq!(svc.get_goal(&pages.id).await.unwrap().progress, 0);
        assert_eq!(
            svc.get_goal(&same_subject.id).await.unwrap().status,
            GoalStatus::Completed
        );
        // The session paid for the minutes; goal credit adds nothing.
        assert_eq!(svc.total_points(&ada.id).await.unwrap(), 30);
        let notes = svc.list_notifications(&ada.id, false, 20).await.unwrap();
        assert!(notes.iter().any(|n| n.kind == NotificationKind::GoalCompleted));
    }

    #[tokio::test]
    async fn groupless_session_uses_every_membership() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let bo = profile(&svc, "Bo").await;
        let g1 = group_with(&svc, &ada, &[]).await;
        let g2 = group_with(&svc, &bo, &[&ada]).await;
        let g3 = group_with(&svc, &bo, &[]).await;
        for g in [&g1, &g2] {
            svc.create_goal(&ada.id, &g.id, goal(GoalUnit::Time, 100, None)).await.unwrap();
        }
        let outside = svc.create_goal(&bo.id, &g3.id, goal(GoalUnit::Time, 100, None)).await.unwrap();

        let done = svc.log_study_session(&ada.id, None, None, 15, None).await.unwrap();
        assert_eq!(done.goals.updated.len(), 2);
        assert!(done.goals.failed.is_empty());
        assert_eq!(svc.get_goal(&outside.id).await.unwrap().progress, 0);
    }

    #[tokio::test]
    async fn session_is_credited_once() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let g = group_with(&svc, &ada, &[]).await;
        let target = svc.create_goal(&ada.id, &g.id, goal(GoalUnit::Time, 100, None)).await.unwrap();
        let done = svc.log_study_session(&ada.id, Some(&g.id), None, 10, None).await.unwrap();

        let again = svc.auto_update_goals(&done.session.id).await.unwrap();
        assert!(again.updated.is_empty());
        assert_eq!(svc.get_goal(&target.id).await.unwrap().progress, 10);
    }

    #[tokio::test]
    async fn failed_goal_lookup_leaves_session_creditable() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let g = group_with(&svc, &ada, &[]).await;
        let target = svc.create_goal(&ada.id, &g.id, goal(GoalUnit::Time, 100, None)).await.unwrap();

        svc.db()
            .conn()
            .execute("ALTER TABLE goals RENAME TO goals_hidden", ())
            .await
            .unwrap();
        assert!(svc.log_study_session(&ada.id, Some(&g.id), None, 25, None).await.is_err());
        svc.db()
            .conn()
            .execute("ALTER TABLE goals_hidden RENAME TO goals", ())
            .await
            .unwrap();

        let sessions = svc.list_study_sessions(&ada.id, 10).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].status, SessionStatus::Completed);

        let retry = svc.auto_update_goals(&sessions[0].id).await.unwrap();
        assert_eq!(retry.updated.len(), 1);
        assert_eq!(svc.get_goal(&target.id).await.unwrap().progress, 25);
    }

    #[tokio::test]
    async fn active_session_is_rejected() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let s = svc.start_study_session(&ada.id, None, None, None).await.unwrap();
        assert!(matches!(
            svc.auto_update_goals(&s.id).await,
            Err(DatabaseError::InvalidState(_))
        ));
        assert!(matches!(
            svc.auto_update_goals("ses-missing").await,
            Err(DatabaseError::NoResult)
        ));
    }
}
