//! Study session repository.
//!
//! Lifecycle: `active -> completed | cancelled`, at most one active session
//! per user. Completing a session pays `session_points(minutes)` into the
//! ledger, credits the minutes to matching time goals and evaluates
//! achievements.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use hall_core::entities::StudySession;
use hall_core::enums::{PointsReason, SessionStatus};
use hall_core::ids::PREFIX_STUDY_SESSION;
use hall_core::responses::{DailyStudyTotal, SessionCompleteResponse};
use hall_core::scoring::{session_minutes, session_points};

use crate::error::DatabaseError;
use crate::helpers::{
    collect_rows, day_start, fmt_ts, get_opt_string, parse_date, parse_datetime, parse_enum,
    parse_optional_datetime,
};
use crate::repos::points::{NewPoints, insert_points};
use crate::service::HallService;

/// Longest session `log_study_session` accepts: one day.
pub const MAX_LOGGED_MINUTES: i64 = 24 * 60;

const SELECT_COLS: &str =
    "id, user_id, group_id, subject_id, started_at, ended_at, duration_minutes, status, notes";

fn row_to_session(row: &libsql::Row) -> Result<StudySession, DatabaseError> {
    Ok(StudySession {
        id: row.get(0)?,
        user_id: row.get(1)?,
        group_id: get_opt_string(row, 2)?,
        subject_id: get_opt_string(row, 3)?,
        started_at: parse_datetime(&row.get::<String>(4)?)?,
        ended_at: parse_optional_datetime(get_opt_string(row, 5)?.as_deref())?,
        duration_minutes: row.get(6)?,
        status: parse_enum(&row.get::<String>(7)?)?,
        notes: get_opt_string(row, 8)?,
    })
}

impl HallService {
    /// Start a timer. Fails if the user already has an active session.
    pub async fn start_study_session(
        &self,
        user_id: &str,
        group_id: Option<&str>,
        subject_id: Option<&str>,
        notes: Option<&str>,
    ) -> Result<StudySession, DatabaseError> {
        self.check_session_scope(user_id, group_id, subject_id).await?;
        if let Some(active) = self.active_study_session(user_id).await? {
            return Err(DatabaseError::InvalidState(format!(
                "{user_id} already has an active session {}",
                active.id
            )));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_STUDY_SESSION).await?;
        self.execute(
            "INSERT INTO study_sessions (id, user_id, group_id, subject_id, started_at, status, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            libsql::params![
                id.as_str(),
                user_id,
                group_id,
                subject_id,
                fmt_ts(now),
                SessionStatus::Active.as_str(),
                notes
            ],
        )
        .await?;

        tracing::debug!(%id, user = user_id, "study session started");
        Ok(StudySession {
            id,
            user_id: user_id.to_string(),
            group_id: group_id.map(String::from),
            subject_id: subject_id.map(String::from),
            started_at: now,
            ended_at: None,
            duration_minutes: 0,
            status: SessionStatus::Active,
            notes: notes.map(String::from),
        })
    }

    pub async fn get_study_session(&self, id: &str) -> Result<StudySession, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM study_sessions WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_session(&row)
    }

    pub async fn active_study_session(
        &self,
        user_id: &str,
    ) -> Result<Option<StudySession>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM study_sessions WHERE user_id = ?1 AND status = 'active'"
                ),
                [user_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_session(&row)?)),
            None => Ok(None),
        }
    }

    /// Stop the user's active session, completing it with whole elapsed minutes.
    pub async fn stop_study_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<SessionCompleteResponse, DatabaseError> {
        let current = self.owned_session(user_id, session_id).await?;
        current
            .status
            .ensure_transition(&current.id, SessionStatus::Completed)?;

        let now = Utc::now();
        let minutes = session_minutes(current.started_at, now);
        let points_id = self.next_points_id().await?;

        let points = {
            let _guard = self.write_guard().await;
            let tx = self.db().conn().transaction().await?;
            tx.execute(
                "UPDATE study_sessions SET status = ?1, ended_at = ?2, duration_minutes = ?3 WHERE id = ?4",
                libsql::params![
                    SessionStatus::Completed.as_str(),
                    fmt_ts(now),
                    minutes,
                    session_id
                ],
            )
            .await?;
            let points = insert_points(
                &tx,
                points_id,
                session_reward(&current, minutes),
                now,
            )
            .await?;
            tx.commit().await?;
            points
        };

        let session = StudySession {
            ended_at: Some(now),
            duration_minutes: minutes,
            status: SessionStatus::Completed,
            ..current
        };
        self.after_session_completed(session, points).await
    }

    /// Record a session that already happened, ending now.
    pub async fn log_study_session(
        &self,
        user_id: &str,
        group_id: Option<&str>,
        subject_id: Option<&str>,
        minutes: i64,
        notes: Option<&str>,
    ) -> Result<SessionCompleteResponse, DatabaseError> {
        if !(1..=MAX_LOGGED_MINUTES).contains(&minutes) {
            return Err(DatabaseError::Validation(format!(
                "session duration must be between 1 and {MAX_LOGGED_MINUTES} minutes, got {minutes}"
            )));
        }
        self.check_session_scope(user_id, group_id, subject_id).await?;

        let now = Utc::now();
        let started_at = now - Duration::minutes(minutes);
        let id = self.db().generate_id(PREFIX_STUDY_SESSION).await?;
        let points_id = self.next_points_id().await?;
        let session = StudySession {
            id,
            user_id: user_id.to_string(),
            group_id: group_id.map(String::from),
            subject_id: subject_id.map(String::from),
            started_at,
            ended_at: Some(now),
            duration_minutes: minutes,
            status: SessionStatus::Completed,
            notes: notes.map(String::from),
        };

        let points = {
            let _guard = self.write_guard().await;
            let tx = self.db().conn().transaction().await?;
            tx.execute(
                &format!(
                    "INSERT INTO study_sessions ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                ),
                libsql::params![
                    session.id.as_str(),
                    user_id,
                    group_id,
                    subject_id,
                    fmt_ts(started_at),
                    fmt_ts(now),
                    minutes,
                    SessionStatus::Completed.as_str(),
                    notes
                ],
            )
            .await?;
            let points = insert_points(&tx, points_id, session_reward(&session, minutes), now).await?;
            tx.commit().await?;
            points
        };

        self.after_session_completed(session, points).await
    }

    /// Abandon an active session. No points are awarded.
    pub async fn cancel_study_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<StudySession, DatabaseError> {
        let current = self.owned_session(user_id, session_id).await?;
        current
            .status
            .ensure_transition(&current.id, SessionStatus::Cancelled)?;

        let now = Utc::now();
        self.execute(
            "UPDATE study_sessions SET status = ?1, ended_at = ?2 WHERE id = ?3",
            libsql::params![SessionStatus::Cancelled.as_str(), fmt_ts(now), session_id],
        )
        .await?;

        Ok(StudySession {
            ended_at: Some(now),
            status: SessionStatus::Cancelled,
            ..current
        })
    }

    /// The user's sessions, newest first.
    pub async fn list_study_sessions(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<StudySession>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM study_sessions WHERE user_id = ?1 \
                     ORDER BY started_at DESC, id LIMIT {limit}"
                ),
                [user_id],
            )
            .await?;
        collect_rows(rows, row_to_session).await
    }

    /// Completed minutes and session counts per UTC day, for the `days` days
    /// ending `today`. Days without sessions are omitted.
    pub async fn daily_study_totals(
        &self,
        user_id: &str,
        days: u32,
        today: NaiveDate,
    ) -> Result<Vec<DailyStudyTotal>, DatabaseError> {
        let first_day = today - Duration::days(i64::from(days.max(1)) - 1);
        let rows = self
            .db()
            .conn()
            .query(
                "SELECT substr(started_at, 1, 10) AS day, SUM(duration_minutes), COUNT(*)
                 FROM study_sessions
                 WHERE user_id = ?1 AND status = 'completed' AND started_at >= ?2
                 GROUP BY day ORDER BY day",
                libsql::params![user_id, day_start(first_day)],
            )
            .await?;
        collect_rows(rows, |row| {
            Ok(DailyStudyTotal {
                date: parse_date(&row.get::<String>(0)?)?,
                minutes: row.get(1)?,
                sessions: row.get(2)?,
            })
        })
        .await
    }

    /// `(completed session count, total completed minutes)` for a user.
    pub async fn session_totals(&self, user_id: &str) -> Result<(i64, i64), DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COUNT(*), COALESCE(SUM(duration_minutes), 0) FROM study_sessions
                 WHERE user_id = ?1 AND status = 'completed'",
                [user_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok((row.get::<i64>(0)?, row.get::<i64>(1)?))
    }

    /// Mark a session as credited to goals. Returns `false` if it already was.
    pub(crate) async fn claim_session_for_goals(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let changed = self
            .execute(
                "UPDATE study_sessions SET goals_applied_at = ?1
                 WHERE id = ?2 AND goals_applied_at IS NULL",
                libsql::params![fmt_ts(now), session_id],
            )
            .await?;
        Ok(changed > 0)
    }

    async fn after_session_completed(
        &self,
        session: StudySession,
        points: Option<hall_core::entities::PointsEntry>,
    ) -> Result<SessionCompleteResponse, DatabaseError> {
        tracing::info!(
            session = %session.id,
            minutes = session.duration_minutes,
            "study session completed"
        );
        let goals = self.auto_update_goals(&session.id).await?;
        let achievements = self.award_achievements(&session.user_id).await?;
        Ok(SessionCompleteResponse {
            session,
            points,
            goals,
            achievements,
        })
    }

    async fn owned_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<StudySession, DatabaseError> {
        let session = self.get_study_session(session_id).await?;
        if session.user_id != user_id {
            return Err(DatabaseError::Forbidden(format!(
                "session {session_id} belongs to another user"
            )));
        }
        Ok(session)
    }

    async fn check_session_scope(
        &self,
        user_id: &str,
        group_id: Option<&str>,
        subject_id: Option<&str>,
    ) -> Result<(), DatabaseError> {
        self.get_profile(user_id).await?;
        if let Some(group_id) = group_id {
            self.require_member(group_id, user_id).await?;
        }
        if let Some(subject_id) = subject_id {
            let subject = self.get_subject(subject_id).await?;
            match group_id {
                Some(group_id) if subject.group_id != group_id => {
                    return Err(DatabaseError::Validation(format!(
                        "subject {subject_id} does not belong to {group_id}"
                    )));
                }
                None => {
                    self.require_member(&subject.group_id, user_id).await?;
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

fn session_reward(session: &StudySession, minutes: i64) -> NewPoints<'_> {
    NewPoints {
        user_id: &session.user_id,
        group_id: session.group_id.as_deref(),
        amount: session_points(minutes),
        reason: PointsReason::StudySession,
        source_id: Some(&session.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{group_with, profile, test_service};
    use hall_core::enums::AchievementKind;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn only_one_active_session() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let s = svc.start_study_session(&ada.id, None, None, None).await.unwrap();
        assert_eq!(s.status, SessionStatus::Active);

        assert!(matches!(
            svc.start_study_session(&ada.id, None, None, None).await,
            Err(DatabaseError::InvalidState(_))
        ));
        assert_eq!(
            svc.active_study_session(&ada.id).await.unwrap().map(|s| s.id),
            Some(s.id)
        );
    }

    #[tokio::test]
    async fn stop_immediately_completes_with_zero_minutes() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let s = svc.start_study_session(&ada.id, None, None, None).await.unwrap();

        let done = svc.stop_study_session(&ada.id, &s.id).await.unwrap();
        assert_eq!(done.session.status, SessionStatus::Completed);
        assert_eq!(done.session.duration_minutes, 0);
        assert!(done.points.is_none());
        assert!(done.goals.updated.is_empty());
        assert!(svc.active_study_session(&ada.id).await.unwrap().is_none());

        assert!(matches!(
            svc.stop_study_session(&ada.id, &s.id).await,
            Err(DatabaseError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn cancel_awards_nothing() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let bo = profile(&svc, "Bo").await;
        let s = svc.start_study_session(&ada.id, None, None, None).await.unwrap();

        assert!(matches!(
            svc.cancel_study_session(&bo.id, &s.id).await,
            Err(DatabaseError::Forbidden(_))
        ));
        let cancelled = svc.cancel_study_session(&ada.id, &s.id).await.unwrap();
        assert_eq!(cancelled.status, SessionStatus::Cancelled);
        assert_eq!(svc.total_points(&ada.id).await.unwrap(), 0);
        assert_eq!(svc.session_totals(&ada.id).await.unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn logged_session_pays_minutes_and_earns_first_session() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let g = group_with(&svc, &ada, &[]).await;

        let done = svc
            .log_study_session(&ada.id, Some(&g.id), None, 45, Some("flashcards"))
            .await
            .unwrap();
        let points = done.points.unwrap();
        assert_eq!(points.amount, 45);
        assert_eq!(points.group_id.as_deref(), Some(g.id.as_str()));
        assert_eq!(points.reason, PointsReason::StudySession);
        assert_eq!(done.achievements, vec![AchievementKind::FirstSession]);
        assert_eq!(svc.session_totals(&ada.id).await.unwrap(), (1, 45));
    }

    #[tokio::test]
    async fn logging_requires_positive_minutes_and_membership() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let eve = profile(&svc, "Eve").await;
        let g = group_with(&svc, &ada, &[]).await;

        assert!(matches!(
            svc.log_study_session(&ada.id, None, None, 0, None).await,
            Err(DatabaseError::Validation(_))
        ));
        assert!(matches!(
            svc.log_study_session(&eve.id, Some(&g.id), None, 10, None).await,
            Err(DatabaseError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn logging_caps_duration_at_one_day() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;

        for minutes in [MAX_LOGGED_MINUTES + 1, 200_000_000_000_000, i64::MAX] {
            assert!(matches!(
                svc.log_study_session(&ada.id, None, None, minutes, None).await,
                Err(DatabaseError::Validation(_))
            ));
        }
        let done = svc
            .log_study_session(&ada.id, None, None, MAX_LOGGED_MINUTES, None)
            .await
            .unwrap();
        assert_eq!(done.session.duration_minutes, MAX_LOGGED_MINUTES);
    }

    #[tokio::test]
    async fn daily_totals_group_by_day() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        svc.log_study_session(&ada.id, None, None, 20, None).await.unwrap();
        svc.log_study_session(&ada.id, None, None, 10, None).await.unwrap();

        let now = Utc::now();
        let totals = svc
            .daily_study_totals(&ada.id, 7, now.date_naive())
            .await
            .unwrap();
        let minutes: i64 = totals.iter().map(|t| t.minutes).sum();
        let sessions: i64 = totals.iter().map(|t| t.sessions).sum();
        assert_eq!(minutes, 30);
        assert_eq!(sessions, 2);
    }
}
