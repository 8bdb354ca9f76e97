//! Photo activity posts.

use chrono::Utc;

use hall_core::entities::Activity;
use hall_core::ids::PREFIX_ACTIVITY;

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, fmt_ts, get_opt_string, parse_datetime};
use crate::service::HallService;

const SELECT_COLS: &str = "id, group_id, user_id, caption, image_url, created_at";

fn row_to_activity(row: &libsql::Row) -> Result<Activity, DatabaseError> {
    Ok(Activity {
        id: row.get(0)?,
        group_id: row.get(1)?,
        user_id: row.get(2)?,
        caption: get_opt_string(row, 3)?,
        image_url: row.get(4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl HallService {
    pub async fn post_activity(
        &self,
        user_id: &str,
        group_id: &str,
        image_url: &str,
        caption: Option<&str>,
    ) -> Result<Activity, DatabaseError> {
        self.require_member(group_id, user_id).await?;
        let image_url = image_url.trim();
        if image_url.is_empty() {
            return Err(DatabaseError::Validation("an activity needs an image URL".into()));
        }
        let caption = caption.map(str::trim).filter(|c| !c.is_empty());

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ACTIVITY).await?;
        self.execute(
            &format!("INSERT INTO activities ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            libsql::params![id.as_str(), group_id, user_id, caption, image_url, fmt_ts(now)],
        )
        .await?;

        Ok(Activity {
            id,
            group_id: group_id.to_string(),
            user_id: user_id.to_string(),
            caption: caption.map(String::from),
            image_url: image_url.to_string(),
            created_at: now,
        })
    }

    /// Newest posts first.
    pub async fn list_activities(
        &self,
        group_id: &str,
        limit: u32,
    ) -> Result<Vec<Activity>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM activities WHERE group_id = ?1 \
                     ORDER BY created_at DESC, id LIMIT {limit}"
                ),
                [group_id],
            )
            .await?;
        collect_rows(rows, row_to_activity).await
    }

    pub async fn delete_activity(&self, user_id: &str, activity_id: &str) -> Result<(), DatabaseError> {
        let changed = self
            .execute(
                "DELETE FROM activities WHERE id = ?1 AND user_id = ?2",
                [activity_id, user_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }
}
