//! Remind users who are below their daily water goal.

use chrono::NaiveDate;

use hall_core::enums::NotificationKind;
use hall_core::responses::WaterReminderResponse;
use hall_core::water::water_progress;

use crate::error::DatabaseError;
use crate::helpers::collect_rows;
use crate::jobs::failed;
use crate::repos::notification::NewNotification;
use crate::service::HallService;

impl HallService {
    /// Send one `water_reminder` per user under the goal on `date`.
    ///
    /// The reminder references the date, so repeated runs on the same day
    /// skip users already reminded.
    pub async fn water_reminders(
        &self,
        date: NaiveDate,
    ) -> Result<WaterReminderResponse, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query("SELECT id FROM profiles ORDER BY id", ())
            .await?;
        let user_ids = collect_rows(rows, |row| Ok(row.get::<String>(0)?)).await?;

        let mut response = WaterReminderResponse {
            date,
            reminded: Vec::new(),
            failed: Vec::new(),
        };
        for user_id in user_ids {
            match self.remind_if_thirsty(&user_id, date).await {
                Ok(true) => response.reminded.push(user_id),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(user = %user_id, error = %e, "water reminder failed");
                    response.failed.push(failed(&user_id, &e));
                }
            }
        }
        tracing::info!(%date, reminded = response.reminded.len(), "water reminders sent");
        Ok(response)
    }

    async fn remind_if_thirsty(&self, user_id: &str, date: NaiveDate) -> Result<bool, DatabaseError> {
        let reference = date.to_string();
        if self
            .has_notification_for(user_id, NotificationKind::WaterReminder, &reference)
            .await?
        {
            return Ok(false);
        }
        let total = self.water_total_for_day(user_id, date).await?;
        let progress = water_progress(total, self.water_goal_ml());
        if progress.goal_met() {
            return Ok(false);
        }

        let body = format!(
            "{} ml of {} ml so far, {} ml to go",
            progress.total_ml, progress.goal_ml, progress.remaining_ml
        );
        self.create_notification(
            user_id,
            &NewNotification {
                kind: NotificationKind::WaterReminder,
                title: "Time for some water",
                body: Some(&body),
                reference_id: Some(&reference),
            },
        )
        .await?;
        Ok(true)
    }
}
