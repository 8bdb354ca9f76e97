//! Group chat messages.

use chrono::Utc;

use hall_core::entities::Message;
use hall_core::enums::NotificationKind;
use hall_core::ids::PREFIX_MESSAGE;

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, fmt_ts, parse_datetime};
use crate::repos::notification::NewNotification;
use crate::service::HallService;

const SELECT_COLS: &str = "id, group_id, sender_id, content, created_at";

/// Longest message body accepted.
pub const MAX_MESSAGE_CHARS: usize = 4000;

fn row_to_message(row: &libsql::Row) -> Result<Message, DatabaseError> {
    Ok(Message {
        id: row.get(0)?,
        group_id: row.get(1)?,
        sender_id: row.get(2)?,
        content: row.get(3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl HallService {
    /// Post a message to a group and notify the other members.
    pub async fn send_message(
        &self,
        sender_id: &str,
        group_id: &str,
        content: &str,
    ) -> Result<Message, DatabaseError> {
        self.require_member(group_id, sender_id).await?;
        let content = content.trim();
        if content.is_empty() {
            return Err(DatabaseError::Validation("message must not be empty".into()));
        }
        if content.chars().count() > MAX_MESSAGE_CHARS {
            return Err(DatabaseError::Validation(format!(
                "message exceeds {MAX_MESSAGE_CHARS} characters"
            )));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_MESSAGE).await?;
        self.execute(
            &format!("INSERT INTO messages ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
            libsql::params![id.as_str(), group_id, sender_id, content, fmt_ts(now)],
        )
        .await?;

        let sender = self.get_profile(sender_id).await?;
        let title = format!("New message from {}", sender.display_name);
        let preview: String = content.chars().take(80).collect();
        self.notify_group(
            group_id,
            Some(sender_id),
            &NewNotification {
                kind: NotificationKind::Message,
                title: &title,
                body: Some(&preview),
                reference_id: Some(group_id),
            },
        )
        .await?;

        Ok(Message {
            id,
            group_id: group_id.to_string(),
            sender_id: sender_id.to_string(),
            content: content.to_string(),
            created_at: now,
        })
    }

    /// The latest `limit` messages, returned oldest first.
    pub async fn list_messages(
        &self,
        reader_id: &str,
        group_id: &str,
        limit: u32,
    ) -> Result<Vec<Message>, DatabaseError> {
        self.require_member(group_id, reader_id).await?;
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM messages WHERE group_id = ?1 \
                     ORDER BY created_at DESC, id DESC LIMIT {limit}"
                ),
                [group_id],
            )
            .await?;
        let mut messages = collect_rows(rows, row_to_message).await?;
        messages.reverse();
        Ok(messages)
    }

    /// Delete one of the sender's own messages.
    pub async fn delete_message(&self, sender_id: &str, message_id: &str) -> Result<(), DatabaseError> {
        let changed = self
            .execute(
                "DELETE FROM messages WHERE id = ?1 AND sender_id = ?2",
                [message_id, sender_id],
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
    use crate::test_support::helpers::{group_with, profile, test_service};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn page_is_latest_messages_oldest_first() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let bo = profile(&svc, "Bo").await;
        let g = group_with(&svc, &ada, &[&bo]).await;

        for text in ["one", "two", "three"] {
            svc.send_message(&ada.id, &g.id, text).await.unwrap();
        }
        let page: Vec<_> = svc
            .list_messages(&bo.id, &g.id, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(page, vec!["two", "three"]);
        assert_eq!(svc.unread_notification_count(&bo.id).await.unwrap(), 3);
        assert_eq!(svc.unread_notification_count(&ada.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn empty_or_outsider_messages_rejected() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let eve = profile(&svc, "Eve").await;
        let g = group_with(&svc, &ada, &[]).await;

        assert!(matches!(
            svc.send_message(&ada.id, &g.id, "   ").await,
            Err(DatabaseError::Validation(_))
        ));
        assert!(matches!(
            svc.send_message(&eve.id, &g.id, "hi").await,
            Err(DatabaseError::Forbidden(_))
        ));
        assert!(matches!(
            svc.list_messages(&eve.id, &g.id, 10).await,
            Err(DatabaseError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn only_sender_deletes() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let bo = profile(&svc, "Bo").await;
        let g = group_with(&svc, &ada, &[&bo]).await;
        let m = svc.send_message(&ada.id, &g.id, "oops").await.unwrap();

        assert!(matches!(
            svc.delete_message(&bo.id, &m.id).await,
            Err(DatabaseError::NoResult)
        ));
        svc.delete_message(&ada.id, &m.id).await.unwrap();
        assert!(svc.list_messages(&ada.id, &g.id, 10).await.unwrap().is_empty());
    }
}
