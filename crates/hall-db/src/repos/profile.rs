//! Profile repository: create, read, update and aggregated stats.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};

use hall_core::achievements::UserStats;
use hall_core::entities::Profile;
use hall_core::ids::PREFIX_PROFILE;
use hall_core::responses::ProfileStatsResponse;
use hall_core::streak::{current_streak, longest_streak};

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, fmt_ts, get_opt_string, parse_date, parse_datetime};
use crate::service::HallService;
use crate::updates::SetClauses;
use crate::updates::profile::ProfileUpdate;

const SELECT_COLS: &str = "id, display_name, avatar_url, created_at, updated_at";

fn row_to_profile(row: &libsql::Row) -> Result<Profile, DatabaseError> {
    Ok(Profile {
        id: row.get(0)?,
        display_name: row.get(1)?,
        avatar_url: get_opt_string(row, 2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
        updated_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

fn validate_display_name(name: &str) -> Result<&str, DatabaseError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DatabaseError::Validation(
            "display name must not be empty".into(),
        ));
    }
    Ok(trimmed)
}

impl HallService {
    pub async fn create_profile(
        &self,
        display_name: &str,
        avatar_url: Option<&str>,
    ) -> Result<Profile, DatabaseError> {
        let display_name = validate_display_name(display_name)?;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_PROFILE).await?;

        self.execute(
            &format!("INSERT INTO profiles ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
            libsql::params![
                id.as_str(),
                display_name,
                avatar_url,
                fmt_ts(now),
                fmt_ts(now)
            ],
        )
        .await?;

        tracing::debug!(%id, "profile created");
        Ok(Profile {
            id,
            display_name: display_name.to_string(),
            avatar_url: avatar_url.map(String::from),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_profile(&self, id: &str) -> Result<Profile, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM profiles WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_profile(&row)
    }

    pub async fn list_profiles(&self, limit: u32) -> Result<Vec<Profile>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM profiles ORDER BY display_name, id LIMIT {limit}"
                ),
                (),
            )
            .await?;
        collect_rows(rows, row_to_profile).await
    }

    pub async fn update_profile(
        &self,
        id: &str,
        update: ProfileUpdate,
    ) -> Result<Profile, DatabaseError> {
        let mut clauses = SetClauses::default();
        if let Some(ref name) = update.display_name {
            clauses.push("display_name", validate_display_name(name)?.to_string());
        }
        if let Some(ref avatar) = update.avatar_url {
            clauses.push(
                "avatar_url",
                avatar.clone().map_or(libsql::Value::Null, Into::into),
            );
        }

        if clauses.is_empty() {
            return self.get_profile(id).await;
        }
        clauses.push("updated_at", fmt_ts(Utc::now()));

        let (sql, params) = clauses.into_update("profiles", id);
        let changed = self.execute(&sql, libsql::params_from_iter(params)).await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.get_profile(id).await
    }

    /// Distinct UTC dates on which the user completed a study session.
    pub async fn study_days(&self, user_id: &str) -> Result<BTreeSet<NaiveDate>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT DISTINCT substr(started_at, 1, 10) FROM study_sessions
                 WHERE user_id = ?1 AND status = 'completed'",
                [user_id],
            )
            .await?;
        let mut days = BTreeSet::new();
        while let Some(row) = rows.next().await? {
            days.insert(parse_date(&row.get::<String>(0)?)?);
        }
        Ok(days)
    }

    /// Completed goals across every group the user belongs to.
    pub async fn count_completed_goals(&self, user_id: &str) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COUNT(*) FROM goals g
                 JOIN group_members m ON m.group_id = g.group_id
                 WHERE m.user_id = ?1 AND g.status = 'completed'",
                [user_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    /// Gather the inputs the achievement rules evaluate.
    pub async fn user_stats(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<UserStats, DatabaseError> {
        let (completed_sessions, _) = self.session_totals(user_id).await?;
        let days = self.study_days(user_id).await?;
        let total_points = self.total_points(user_id).await?;
        let goals_completed = self.count_completed_goals(user_id).await?;
        let water = self.water_total_for_day(user_id, today).await?;

        Ok(UserStats {
            completed_sessions,
            current_streak: current_streak(&days, today),
            total_points,
            goals_completed,
            met_water_goal_today: water >= self.water_goal_ml(),
        })
    }

    pub async fn profile_stats(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<ProfileStatsResponse, DatabaseError> {
        let profile = self.get_profile(user_id).await?;
        let (completed_sessions, total_minutes) = self.session_totals(user_id).await?;
        let days = self.study_days(user_id).await?;

        Ok(ProfileStatsResponse {
            profile,
            total_points: self.total_points(user_id).await?,
            total_minutes,
            completed_sessions,
            current_streak: current_streak(&days, today),
            longest_streak: longest_streak(&days),
            goals_completed: self.count_completed_goals(user_id).await?,
            achievements: self.list_achievements(user_id).await?,
        })
    }
}
