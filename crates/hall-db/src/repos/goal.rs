//! Goal repository: CRUD, status transitions and progress updates.
//!
//! Progress moves only through [`HallService::update_goal_progress`] (and the
//! session-driven variant used by `auto_update_goals`). The read, clamp,
//! write and ledger insert run in one transaction so concurrent updates on
//! the same database cannot lose increments.

use chrono::{NaiveDate, Utc};

use hall_core::entities::Goal;
use hall_core::enums::{GoalStatus, GoalUnit, NotificationKind, PointsReason};
use hall_core::ids::PREFIX_GOAL;
use hall_core::responses::GoalProgressResponse;
use hall_core::scoring::{ProgressStep, apply_progress, points_for};

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, fmt_ts, get_opt_string, parse_datetime, parse_enum, parse_optional_date};
use crate::repos::notification::NewNotification;
use crate::repos::points::{NewPoints, insert_points};
use crate::service::HallService;
use crate::updates::SetClauses;
use crate::updates::goal::GoalUpdate;

const SELECT_COLS: &str = "id, group_id, subject_id, title, unit, target, progress, status, \
                           deadline, created_by, created_at, updated_at";

fn row_to_goal(row: &libsql::Row) -> Result<Goal, DatabaseError> {
    Ok(Goal {
        id: row.get(0)?,
        group_id: row.get(1)?,
        subject_id: get_opt_string(row, 2)?,
        title: row.get(3)?,
        unit: parse_enum(&row.get::<String>(4)?)?,
        target: row.get(5)?,
        progress: row.get(6)?,
        status: parse_enum(&row.get::<String>(7)?)?,
        deadline: parse_optional_date(get_opt_string(row, 8)?.as_deref())?,
        created_by: row.get(9)?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
        updated_at: parse_datetime(&row.get::<String>(11)?)?,
    })
}

async fn fetch_goal(conn: &libsql::Connection, id: &str) -> Result<Goal, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {SELECT_COLS} FROM goals WHERE id = ?1"), [id])
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    row_to_goal(&row)
}

/// Parameters for a new goal.
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub title: String,
    pub unit: GoalUnit,
    pub target: i64,
    pub subject_id: Option<String>,
    pub deadline: Option<NaiveDate>,
}

/// Outcome of one committed progress step, before side effects.
pub(crate) struct ProgressOutcome {
    pub goal: Goal,
    pub step: ProgressStep,
    pub points_awarded: i64,
}

impl HallService {
    pub async fn create_goal(
        &self,
        actor_id: &str,
        group_id: &str,
        new: NewGoal,
    ) -> Result<Goal, DatabaseError> {
        self.require_member(group_id, actor_id).await?;
        let title = new.title.trim();
        if title.is_empty() {
            return Err(DatabaseError::Validation("goal title must not be empty".into()));
        }
        if new.target <= 0 {
            return Err(DatabaseError::Validation(format!(
                "goal target must be positive, got {}",
                new.target
            )));
        }
        if let Some(ref subject_id) = new.subject_id {
            self.require_subject_in_group(subject_id, group_id).await?;
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_GOAL).await?;
        self.execute(
            &format!(
                "INSERT INTO goals ({SELECT_COLS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8, ?9, ?10, ?11)"
            ),
            libsql::params![
                id.as_str(),
                group_id,
                new.subject_id.as_deref(),
                title,
                new.unit.as_str(),
                new.target,
                GoalStatus::Active.as_str(),
                new.deadline.map(|d| d.to_string()),
                actor_id,
                fmt_ts(now),
                fmt_ts(now)
            ],
        )
        .await?;

        tracing::debug!(%id, group = group_id, "goal created");
        Ok(Goal {
            id,
            group_id: group_id.to_string(),
            subject_id: new.subject_id,
            title: title.to_string(),
            unit: new.unit,
            target: new.target,
            progress: 0,
            status: GoalStatus::Active,
            deadline: new.deadline,
            created_by: actor_id.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_goal(&self, id: &str) -> Result<Goal, DatabaseError> {
        fetch_goal(self.db().conn(), id).await
    }

    /// Goals in a group, optionally filtered by status.
    pub async fn list_goals(
        &self,
        group_id: &str,
        status: Option<GoalStatus>,
    ) -> Result<Vec<Goal>, DatabaseError> {
        let rows = match status {
            Some(status) => {
                self.db()
                    .conn()
                    .query(
                        &format!(
                            "SELECT {SELECT_COLS} FROM goals WHERE group_id = ?1 AND status = ?2 \
                             ORDER BY created_at, id"
                        ),
                        [group_id, status.as_str()],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(
                        &format!(
                            "SELECT {SELECT_COLS} FROM goals WHERE group_id = ?1 \
                             ORDER BY status, created_at, id"
                        ),
                        [group_id],
                    )
                    .await?
            }
        };
        collect_rows(rows, row_to_goal).await
    }

    /// Active time goals a session in `group_ids` with `subject_id` counts toward.
    pub async fn matching_time_goals(
        &self,
        group_ids: &[String],
        subject_id: Option<&str>,
    ) -> Result<Vec<Goal>, DatabaseError> {
        let mut goals = Vec::new();
        for group_id in group_ids {
            for goal in self.list_goals(group_id, Some(GoalStatus::Active)).await? {
                let subject_matches = match goal.subject_id.as_deref() {
                    None => true,
                    Some(goal_subject) => Some(goal_subject) == subject_id,
                };
                if goal.unit == GoalUnit::Time && subject_matches {
                    goals.push(goal);
                }
            }
        }
        Ok(goals)
    }

    pub async fn update_goal(
        &self,
        actor_id: &str,
        goal_id: &str,
        update: GoalUpdate,
    ) -> Result<Goal, DatabaseError> {
        let current = self.get_goal(goal_id).await?;
        self.require_member(&current.group_id, actor_id).await?;

        let mut clauses = SetClauses::default();
        if let Some(ref title) = update.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(DatabaseError::Validation("goal title must not be empty".into()));
            }
            clauses.push("title", title.to_string());
        }
        if let Some(target) = update.target {
            if target <= 0 || target < current.progress {
                return Err(DatabaseError::Validation(format!(
                    "goal target must be positive and at least the current progress ({}), got {target}",
                    current.progress
                )));
            }
            clauses.push("target", target);
            match current.status {
                GoalStatus::Active if target == current.progress => {
                    clauses.push("status", GoalStatus::Completed.as_str());
                }
                // A raised target reopens a completed goal.
                GoalStatus::Completed if target > current.progress => {
                    clauses.push("status", GoalStatus::Active.as_str());
                }
                _ => {}
            }
        }
        if let Some(deadline) = update.deadline {
            clauses.push(
                "deadline",
                deadline.map_or(libsql::Value::Null, |d| d.to_string().into()),
            );
        }
        if let Some(ref subject_id) = update.subject_id {
            if let Some(subject_id) = subject_id {
                self.require_subject_in_group(subject_id, &current.group_id)
                    .await?;
            }
            clauses.push(
                "subject_id",
                subject_id.clone().map_or(libsql::Value::Null, Into::into),
            );
        }

        if clauses.is_empty() {
            return Ok(current);
        }
        clauses.push("updated_at", fmt_ts(Utc::now()));
        let (sql, params) = clauses.into_update("goals", goal_id);
        self.execute(&sql, libsql::params_from_iter(params)).await?;
        self.get_goal(goal_id).await
    }

    /// Manually complete or archive a goal. Creator or group owner/admin only.
    pub async fn transition_goal(
        &self,
        actor_id: &str,
        goal_id: &str,
        new_status: GoalStatus,
    ) -> Result<Goal, DatabaseError> {
        let current = self.get_goal(goal_id).await?;
        self.require_goal_editor(&current, actor_id).await?;

        current.status.ensure_transition(goal_id, new_status)?;

        let now = Utc::now();
        self.execute(
            "UPDATE goals SET status = ?1, updated_at = ?2 WHERE id = ?3",
            libsql::params![new_status.as_str(), fmt_ts(now), goal_id],
        )
        .await?;

        Ok(Goal {
            status: new_status,
            updated_at: now,
            ..current
        })
    }

    /// Delete a goal. Creator or group owner/admin only.
    pub async fn delete_goal(&self, actor_id: &str, goal_id: &str) -> Result<(), DatabaseError> {
        let current = self.get_goal(goal_id).await?;
        self.require_goal_editor(&current, actor_id).await?;
        self.execute("DELETE FROM goals WHERE id = ?1", [goal_id]).await?;
        Ok(())
    }

    /// Add `delta` to a goal on behalf of a member.
    ///
    /// Progress is clamped at the target; the member earns
    /// `applied x unit multiplier` points. Reaching the target completes the
    /// goal and notifies the group.
    pub async fn update_goal_progress(
        &self,
        actor_id: &str,
        goal_id: &str,
        delta: i64,
    ) -> Result<GoalProgressResponse, DatabaseError> {
        if delta <= 0 {
            return Err(DatabaseError::Validation(format!(
                "progress delta must be positive, got {delta}"
            )));
        }
        let goal = self.get_goal(goal_id).await?;
        self.require_member(&goal.group_id, actor_id).await?;

        let outcome = self.apply_goal_delta(goal_id, actor_id, delta, true).await?;
        self.finish_goal_progress(actor_id, outcome).await
    }

    /// Transactionally apply `delta` to a goal.
    ///
    /// With `award_points` unset no ledger row is written; session-driven
    /// updates already paid for the minutes through the session itself.
    pub(crate) async fn apply_goal_delta(
        &self,
        goal_id: &str,
        user_id: &str,
        delta: i64,
        award_points: bool,
    ) -> Result<ProgressOutcome, DatabaseError> {
        let points_id = self.next_points_id().await?;
        let now = Utc::now();

        let _guard = self.write_guard().await;
        let tx = self.db().conn().transaction().await?;
        let goal = fetch_goal(&tx, goal_id).await?;
        if goal.status == GoalStatus::Archived {
            tx.rollback().await?;
            return Err(DatabaseError::InvalidState(format!(
                "goal {goal_id} is archived"
            )));
        }

        let step = apply_progress(goal.progress, goal.target, delta);
        let status = if step.completed {
            GoalStatus::Completed
        } else {
            goal.status
        };
        if step.applied > 0 {
            tx.execute(
                "UPDATE goals SET progress = ?1, status = ?2, updated_at = ?3 WHERE id = ?4",
                libsql::params![step.new_progress, status.as_str(), fmt_ts(now), goal_id],
            )
            .await?;
        }

        let amount = if award_points {
            points_for(goal.unit, step.applied)
        } else {
            0
        };
        let entry = insert_points(
            &tx,
            points_id,
            NewPoints {
                user_id,
                group_id: Some(&goal.group_id),
                amount,
                reason: PointsReason::GoalProgress,
                source_id: Some(goal_id),
            },
            now,
        )
        .await?;
        tx.commit().await?;

        let points_awarded = entry.map_or(0, |e| e.amount);
        let updated_at = if step.applied > 0 { now } else { goal.updated_at };
        Ok(ProgressOutcome {
            goal: Goal {
                progress: step.new_progress,
                status,
                updated_at,
                ..goal
            },
            step,
            points_awarded,
        })
    }

    /// Post-commit side effects: completion notice and achievements.
    pub(crate) async fn finish_goal_progress(
        &self,
        actor_id: &str,
        outcome: ProgressOutcome,
    ) -> Result<GoalProgressResponse, DatabaseError> {
        let ProgressOutcome {
            goal,
            step,
            points_awarded,
        } = outcome;

        if step.completed {
            self.notify_goal_completed(&goal).await?;
        }
        let achievements = self.award_achievements(actor_id).await?;

        Ok(GoalProgressResponse {
            goal,
            applied: step.applied,
            points_awarded,
            completed: step.completed,
            achievements,
        })
    }

    /// Tell every member of the goal's group that it reached its target.
    pub(crate) async fn notify_goal_completed(&self, goal: &Goal) -> Result<u32, DatabaseError> {
        tracing::info!(goal = %goal.id, "goal completed");
        let title = format!("Goal completed: {}", goal.title);
        self.notify_group(
            &goal.group_id,
            None,
            &NewNotification {
                kind: NotificationKind::GoalCompleted,
                title: &title,
                body: None,
                reference_id: Some(&goal.id),
            },
        )
        .await
    }

    async fn require_subject_in_group(
        &self,
        subject_id: &str,
        group_id: &str,
    ) -> Result<(), DatabaseError> {
        let subject = self.get_subject(subject_id).await?;
        if subject.group_id != group_id {
            return Err(DatabaseError::Validation(format!(
                "subject {subject_id} does not belong to {group_id}"
            )));
        }
        Ok(())
    }

    async fn require_goal_editor(&self, goal: &Goal, actor_id: &str) -> Result<(), DatabaseError> {
        if goal.created_by == actor_id {
            self.require_member(&goal.group_id, actor_id).await?;
        } else {
            self.require_manager(&goal.group_id, actor_id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{group_with, profile, test_service};
    use crate::updates::goal::GoalUpdateBuilder;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn new_goal(unit: GoalUnit, target: i64) -> NewGoal {
        NewGoal {
            title: "Chapter 3".into(),
            unit,
            target,
            subject_id: None,
            deadline: None,
        }
    }

    #[tokio::test]
    async fn create_goal_roundtrip() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let g = group_with(&svc, &ada, &[]).await;
        let deadline = NaiveDate::from_ymd_opt(2030, 6, 1);

        let goal = svc
            .create_goal(
                &ada.id,
                &g.id,
                NewGoal {
                    deadline,
                    ..new_goal(GoalUnit::Pages, 50)
                },
            )
            .await
            .unwrap();
        assert!(goal.id.starts_with("gol-"));
        assert_eq!(svc.get_goal(&goal.id).await.unwrap(), goal);
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    #[tokio::test]
    async fn non_positive_target_rejected(#[case] target: i64) {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let g = group_with(&svc, &ada, &[]).await;
        let err = svc
            .create_goal(&ada.id, &g.id, new_goal(GoalUnit::Pages, target))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }

    #[rstest]
    #[case(GoalUnit::Exercises, 10, 4, 4, 20)]
    #[case(GoalUnit::Pages, 10, 4, 4, 4)]
    #[case(GoalUnit::Time, 30, 45, 30, 30)]
    #[case(GoalUnit::Exercises, 3, 7, 3, 15)]
    #[tokio::test]
    async fn progress_awards_delta_times_multiplier(
        #[case] unit: GoalUnit,
        #[case] target: i64,
        #[case] delta: i64,
        #[case] applied: i64,
        #[case] points: i64,
    ) {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let g = group_with(&svc, &ada, &[]).await;
        let goal = svc.create_goal(&ada.id, &g.id, new_goal(unit, target)).await.unwrap();

        let resp = svc.update_goal_progress(&ada.id, &goal.id, delta).await.unwrap();
        assert_eq!(resp.applied, applied);
        assert_eq!(resp.points_awarded, points);
        assert!(resp.goal.progress <= resp.goal.target);
        assert_eq!(svc.total_points(&ada.id).await.unwrap(), points);
    }

    #[tokio::test]
    async fn reaching_target_completes_and_notifies() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let bo = profile(&svc, "Bo").await;
        let g = group_with(&svc, &ada, &[&bo]).await;
        let goal = svc
            .create_goal(&ada.id, &g.id, new_goal(GoalUnit::Exercises, 5))
            .await
            .unwrap();

        let first = svc.update_goal_progress(&bo.id, &goal.id, 3).await.unwrap();
        assert!(!first.completed);
        let second = svc.update_goal_progress(&ada.id, &goal.id, 3).await.unwrap();
        assert!(second.completed);
        assert_eq!(second.applied, 2);
        assert_eq!(second.goal.status, GoalStatus::Completed);

        let notes = svc.list_notifications(&bo.id, true, 10).await.unwrap();
        assert!(notes.iter().any(|n| n.kind == NotificationKind::GoalCompleted));

        // Already at target: nothing applies, nothing is paid.
        let third = svc.update_goal_progress(&bo.id, &goal.id, 4).await.unwrap();
        assert_eq!(third.applied, 0);
        assert_eq!(third.points_awarded, 0);
        assert!(!third.completed);
        assert_eq!(svc.get_goal(&goal.id).await.unwrap().progress, 5);
    }

    #[tokio::test]
    async fn invalid_progress_inputs() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let eve = profile(&svc, "Eve").await;
        let g = group_with(&svc, &ada, &[]).await;
        let goal = svc
            .create_goal(&ada.id, &g.id, new_goal(GoalUnit::Pages, 5))
            .await
            .unwrap();

        assert!(matches!(
            svc.update_goal_progress(&ada.id, &goal.id, 0).await,
            Err(DatabaseError::Validation(_))
        ));
        assert!(matches!(
            svc.update_goal_progress(&eve.id, &goal.id, 1).await,
            Err(DatabaseError::Forbidden(_))
        ));
        svc.transition_goal(&ada.id, &goal.id, GoalStatus::Archived)
            .await
            .unwrap();
        assert!(matches!(
            svc.update_goal_progress(&ada.id, &goal.id, 1).await,
            Err(DatabaseError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn update_goal_checks_target_against_progress() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let g = group_with(&svc, &ada, &[]).await;
        let goal = svc
            .create_goal(&ada.id, &g.id, new_goal(GoalUnit::Pages, 10))
            .await
            .unwrap();
        svc.update_goal_progress(&ada.id, &goal.id, 6).await.unwrap();

        let too_low = GoalUpdateBuilder::new().target(5).build();
        assert!(matches!(
            svc.update_goal(&ada.id, &goal.id, too_low).await,
            Err(DatabaseError::Validation(_))
        ));

        let exact = GoalUpdateBuilder::new().title("Renamed").target(6).build();
        let updated = svc.update_goal(&ada.id, &goal.id, exact).await.unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.status, GoalStatus::Completed);
    }

    #[tokio::test]
    async fn raising_target_reopens_completed_goal() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let g = group_with(&svc, &ada, &[]).await;
        let goal = svc
            .create_goal(&ada.id, &g.id, new_goal(GoalUnit::Time, 30))
            .await
            .unwrap();
        let done = svc.update_goal_progress(&ada.id, &goal.id, 30).await.unwrap();
        assert_eq!(done.goal.status, GoalStatus::Completed);

        let raised = GoalUpdateBuilder::new().target(60).build();
        let reopened = svc.update_goal(&ada.id, &goal.id, raised).await.unwrap();
        assert_eq!(reopened.status, GoalStatus::Active);
        assert_eq!(reopened.target, 60);

        let matching = svc.matching_time_goals(&[g.id.clone()], None).await.unwrap();
        assert_eq!(matching.len(), 1);

        svc.log_study_session(&ada.id, Some(&g.id), None, 30, None)
            .await
            .unwrap();
        let finished = svc.get_goal(&goal.id).await.unwrap();
        assert_eq!(finished.progress, 60);
        assert_eq!(finished.status, GoalStatus::Completed);
    }

    #[tokio::test]
    async fn list_goals_filters_by_status() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let g = group_with(&svc, &ada, &[]).await;
        let a = svc.create_goal(&ada.id, &g.id, new_goal(GoalUnit::Pages, 1)).await.unwrap();
        svc.create_goal(&ada.id, &g.id, new_goal(GoalUnit::Pages, 9)).await.unwrap();
        svc.update_goal_progress(&ada.id, &a.id, 1).await.unwrap();

        assert_eq!(svc.list_goals(&g.id, None).await.unwrap().len(), 2);
        let done = svc.list_goals(&g.id, Some(GoalStatus::Completed)).await.unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, a.id);
    }

    #[tokio::test]
    async fn member_cannot_delete_others_goal() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let bo = profile(&svc, "Bo").await;
        let g = group_with(&svc, &ada, &[&bo]).await;
        let goal = svc.create_goal(&ada.id, &g.id, new_goal(GoalUnit::Pages, 3)).await.unwrap();

        assert!(matches!(
            svc.delete_goal(&bo.id, &goal.id).await,
            Err(DatabaseError::Forbidden(_))
        ));
        svc.delete_goal(&ada.id, &goal.id).await.unwrap();
        assert!(matches!(svc.get_goal(&goal.id).await, Err(DatabaseError::NoResult)));
    }
}
