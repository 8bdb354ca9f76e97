//! Achievement repository.
//!
//! Kinds are awarded at most once per user (`UNIQUE (user_id, kind)`), after
//! a session completes, after goal progress, and after water is logged.

use chrono::Utc;

use hall_core::achievements::newly_earned;
use hall_core::entities::Achievement;
use hall_core::enums::{AchievementKind, NotificationKind};
use hall_core::ids::PREFIX_ACHIEVEMENT;

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, fmt_ts, parse_datetime, parse_enum};
use crate::repos::notification::NewNotification;
use crate::service::HallService;

fn row_to_achievement(row: &libsql::Row) -> Result<Achievement, DatabaseError> {
    Ok(Achievement {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: parse_enum(&row.get::<String>(2)?)?,
        earned_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

impl HallService {
    pub async fn list_achievements(&self, user_id: &str) -> Result<Vec<Achievement>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                "SELECT id, user_id, kind, earned_at FROM achievements
                 WHERE user_id = ?1 ORDER BY earned_at, id",
                [user_id],
            )
            .await?;
        collect_rows(rows, row_to_achievement).await
    }

    /// Evaluate the user's stats and store any newly earned kinds.
    ///
    /// Returns the kinds awarded by this call; each gets a notification.
    pub async fn award_achievements(
        &self,
        user_id: &str,
    ) -> Result<Vec<AchievementKind>, DatabaseError> {
        let now = Utc::now();
        let stats = self.user_stats(user_id, now.date_naive()).await?;
        let already: Vec<AchievementKind> = self
            .list_achievements(user_id)
            .await?
            .into_iter()
            .map(|a| a.kind)
            .collect();

        let mut awarded = Vec::new();
        for kind in newly_earned(&stats, &already) {
            let id = self.db().generate_id(PREFIX_ACHIEVEMENT).await?;
            let inserted = self
                .execute(
                    "INSERT OR IGNORE INTO achievements (id, user_id, kind, earned_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    libsql::params![id.as_str(), user_id, kind.as_str(), fmt_ts(now)],
                )
                .await?;
            if inserted == 0 {
                continue;
            }
            tracing::info!(user = user_id, %kind, "achievement earned");
            self.create_notification(
                user_id,
                &NewNotification {
                    kind: NotificationKind::Achievement,
                    title: kind.title(),
                    body: None,
                    reference_id: Some(&id),
                },
            )
            .await?;
            awarded.push(kind);
        }
        Ok(awarded)
    }
}
