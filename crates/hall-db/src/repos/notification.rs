//! Notification repository.
//!
//! Notifications are written by other repos (invitations, goal completion,
//! achievements, leaderboard and water jobs) and read by their recipient.

use chrono::Utc;

use hall_core::entities::Notification;
use hall_core::enums::NotificationKind;
use hall_core::ids::PREFIX_NOTIFICATION;

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, fmt_ts, get_opt_string, parse_datetime, parse_enum};
use crate::service::HallService;

const SELECT_COLS: &str = "id, user_id, kind, title, body, reference_id, is_read, created_at";

fn row_to_notification(row: &libsql::Row) -> Result<Notification, DatabaseError> {
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: parse_enum(&row.get::<String>(2)?)?,
        title: row.get(3)?,
        body: get_opt_string(row, 4)?,
        reference_id: get_opt_string(row, 5)?,
        read: row.get::<i64>(6)? != 0,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

/// Content of a notification before it is addressed to a recipient.
#[derive(Debug, Clone)]
pub struct NewNotification<'a> {
    pub kind: NotificationKind,
    pub title: &'a str,
    pub body: Option<&'a str>,
    pub reference_id: Option<&'a str>,
}

impl HallService {
    pub async fn create_notification(
        &self,
        user_id: &str,
        new: &NewNotification<'_>,
    ) -> Result<Notification, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_NOTIFICATION).await?;
        self.execute(
            &format!(
                "INSERT INTO notifications ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)"
            ),
            libsql::params![
                id.as_str(),
                user_id,
                new.kind.as_str(),
                new.title,
                new.body,
                new.reference_id,
                fmt_ts(now)
            ],
        )
        .await?;

        tracing::debug!(%id, user = user_id, kind = %new.kind, "notification created");
        Ok(Notification {
            id,
            user_id: user_id.to_string(),
            kind: new.kind,
            title: new.title.to_string(),
            body: new.body.map(String::from),
            reference_id: new.reference_id.map(String::from),
            read: false,
            created_at: now,
        })
    }

    /// Send the same notification to every member of a group except `skip`.
    ///
    /// Returns the number of notifications written.
    pub async fn notify_group(
        &self,
        group_id: &str,
        skip: Option<&str>,
        new: &NewNotification<'_>,
    ) -> Result<u32, DatabaseError> {
        let mut sent = 0;
        for member in self.list_members(group_id).await? {
            if Some(member.user_id.as_str()) == skip {
                continue;
            }
            self.create_notification(&member.user_id, new).await?;
            sent += 1;
        }
        Ok(sent)
    }

    pub async fn list_notifications(
        &self,
        user_id: &str,
        unread_only: bool,
        limit: u32,
    ) -> Result<Vec<Notification>, DatabaseError> {
        let filter = if unread_only { " AND is_read = 0" } else { "" };
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM notifications WHERE user_id = ?1{filter} \
                     ORDER BY created_at DESC, id LIMIT {limit}"
                ),
                [user_id],
            )
            .await?;
        collect_rows(rows, row_to_notification).await
    }

    /// Mark one of the user's notifications read.
    pub async fn mark_notification_read(
        &self,
        user_id: &str,
        notification_id: &str,
    ) -> Result<(), DatabaseError> {
        let changed = self
            .execute(
                "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND user_id = ?2",
                [notification_id, user_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }

    /// Mark every unread notification read. Returns how many changed.
    pub async fn mark_all_notifications_read(&self, user_id: &str) -> Result<u64, DatabaseError> {
        self.execute(
            "UPDATE notifications SET is_read = 1 WHERE user_id = ?1 AND is_read = 0",
            [user_id],
        )
        .await
    }

    pub async fn unread_notification_count(&self, user_id: &str) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND is_read = 0",
                [user_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    /// Whether the user already has a notification of `kind` about `reference_id`.
    pub async fn has_notification_for(
        &self,
        user_id: &str,
        kind: NotificationKind,
        reference_id: &str,
    ) -> Result<bool, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT 1 FROM notifications
                 WHERE user_id = ?1 AND kind = ?2 AND reference_id = ?3
                 LIMIT 1",
                [user_id, kind.as_str(), reference_id],
            )
            .await?;
        Ok(rows.next().await?.is_some())
    }
}
