//! Water intake log and daily progress.

use chrono::{NaiveDate, Utc};

use hall_core::entities::WaterIntake;
use hall_core::ids::PREFIX_WATER;
use hall_core::responses::WaterDayResponse;
use hall_core::water::{MAX_INTAKE_ML, water_progress};

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, day_start, fmt_ts, next_day_start, parse_datetime};
use crate::service::HallService;

fn row_to_intake(row: &libsql::Row) -> Result<WaterIntake, DatabaseError> {
    Ok(WaterIntake {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount_ml: row.get(2)?,
        logged_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

impl HallService {
    /// Log a drink and return today's progress, with any achievement it unlocked.
    pub async fn log_water(
        &self,
        user_id: &str,
        amount_ml: i64,
    ) -> Result<WaterDayResponse, DatabaseError> {
        if amount_ml <= 0 || amount_ml > MAX_INTAKE_ML {
            return Err(DatabaseError::Validation(format!(
                "water amount must be between 1 and {MAX_INTAKE_ML} ml, got {amount_ml} ml"
            )));
        }
        self.get_profile(user_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_WATER).await?;
        self.execute(
            "INSERT INTO water_intake (id, user_id, amount_ml, logged_at) VALUES (?1, ?2, ?3, ?4)",
            libsql::params![id.as_str(), user_id, amount_ml, fmt_ts(now)],
        )
        .await?;

        let mut day = self.water_day(user_id, now.date_naive()).await?;
        day.achievements = self.award_achievements(user_id).await?;
        Ok(day)
    }

    pub async fn water_total_for_day(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COALESCE(SUM(amount_ml), 0) FROM water_intake
                 WHERE user_id = ?1 AND logged_at >= ?2 AND logged_at < ?3",
                libsql::params![user_id, day_start(date), next_day_start(date)],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    /// Progress toward the configured daily goal on `date`.
    pub async fn water_day(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<WaterDayResponse, DatabaseError> {
        let total = self.water_total_for_day(user_id, date).await?;
        Ok(WaterDayResponse {
            user_id: user_id.to_string(),
            date,
            progress: water_progress(total, self.water_goal_ml()),
            achievements: Vec::new(),
        })
    }

    pub async fn list_water_intake(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<WaterIntake>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                "SELECT id, user_id, amount_ml, logged_at FROM water_intake
                 WHERE user_id = ?1 AND logged_at >= ?2 AND logged_at < ?3
                 ORDER BY logged_at, id",
                libsql::params![user_id, day_start(date), next_day_start(date)],
            )
            .await?;
        collect_rows(rows, row_to_intake).await
    }

    /// Remove one of the user's own entries.
    pub async fn delete_water_intake(&self, user_id: &str, id: &str) -> Result<(), DatabaseError> {
        let changed = self
            .execute(
                "DELETE FROM water_intake WHERE id = ?1 AND user_id = ?2",
                [id, user_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HallDb;
    use crate::test_support::helpers::{profile, test_service};
    use hall_core::enums::AchievementKind;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn logging_accumulates_toward_goal() {
        let svc = HallService::from_db(HallDb::open_local(":memory:").await.unwrap())
            .with_water_goal(1000);
        let ada = svc.create_profile("Ada", None).await.unwrap();

        let first = svc.log_water(&ada.id, 400).await.unwrap();
        assert_eq!(first.progress.total_ml, 400);
        assert_eq!(first.progress.remaining_ml, 600);
        assert!(first.achievements.is_empty());

        let second = svc.log_water(&ada.id, 700).await.unwrap();
        assert_eq!(second.progress.percent, 100);
        assert!(second.progress.goal_met());
        assert_eq!(second.achievements, vec![AchievementKind::Hydrated]);
        assert_eq!(
            svc.list_water_intake(&ada.id, Utc::now().date_naive())
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn non_positive_amount_rejected() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        assert!(matches!(
            svc.log_water(&ada.id, 0).await,
            Err(DatabaseError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn oversized_amount_rejected() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        assert!(matches!(
            svc.log_water(&ada.id, 100_000_000_000_000_000).await,
            Err(DatabaseError::Validation(_))
        ));
        svc.log_water(&ada.id, MAX_INTAKE_ML).await.unwrap();
        assert_eq!(
            svc.water_total_for_day(&ada.id, Utc::now().date_naive())
                .await
                .unwrap(),
            MAX_INTAKE_ML
        );
    }

    #[tokio::test]
    async fn other_days_do_not_count() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        svc.log_water(&ada.id, 250).await.unwrap();
        let yesterday = Utc::now().date_naive().pred_opt().unwrap();
        assert_eq!(svc.water_total_for_day(&ada.id, yesterday).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_only_own_entries() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let bo = profile(&svc, "Bo").await;
        svc.log_water(&ada.id, 250).await.unwrap();
        let entry = svc
            .list_water_intake(&ada.id, Utc::now().date_naive())
            .await
            .unwrap()
            .remove(0);

        assert!(matches!(
            svc.delete_water_intake(&bo.id, &entry.id).await,
            Err(DatabaseError::NoResult)
        ));
        svc.delete_water_intake(&ada.id, &entry.id).await.unwrap();
    }
}
