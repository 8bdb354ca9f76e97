//! Shared file metadata. Bytes live elsewhere; only name, URL, size and
//! MIME type are tracked.

use chrono::Utc;

use hall_core::entities::GroupFile;
use hall_core::enums::MemberRole;
use hall_core::ids::PREFIX_FILE;

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, fmt_ts, get_opt_string, parse_datetime};
use crate::service::HallService;

const SELECT_COLS: &str = "id, group_id, uploader_id, name, url, size_bytes, mime_type, created_at";

fn row_to_file(row: &libsql::Row) -> Result<GroupFile, DatabaseError> {
    Ok(GroupFile {
        id: row.get(0)?,
        group_id: row.get(1)?,
        uploader_id: row.get(2)?,
        name: row.get(3)?,
        url: row.get(4)?,
        size_bytes: row.get(5)?,
        mime_type: get_opt_string(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

/// Metadata for a file being shared with a group.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub name: String,
    pub url: String,
    pub size_bytes: i64,
    pub mime_type: Option<String>,
}

impl HallService {
    pub async fn register_file(
        &self,
        uploader_id: &str,
        group_id: &str,
        new: NewFile,
    ) -> Result<GroupFile, DatabaseError> {
        self.require_member(group_id, uploader_id).await?;
        if new.name.trim().is_empty() || new.url.trim().is_empty() {
            return Err(DatabaseError::Validation("file name and URL are required".into()));
        }
        if new.size_bytes < 0 {
            return Err(DatabaseError::Validation("file size cannot be negative".into()));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_FILE).await?;
        self.execute(
            &format!("INSERT INTO group_files ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
            libsql::params![
                id.as_str(),
                group_id,
                uploader_id,
                new.name.trim(),
                new.url.trim(),
                new.size_bytes,
                new.mime_type.as_deref(),
                fmt_ts(now)
            ],
        )
        .await?;

        Ok(GroupFile {
            id,
            group_id: group_id.to_string(),
            uploader_id: uploader_id.to_string(),
            name: new.name.trim().to_string(),
            url: new.url.trim().to_string(),
            size_bytes: new.size_bytes,
            mime_type: new.mime_type,
            created_at: now,
        })
    }

    pub async fn get_file(&self, id: &str) -> Result<GroupFile, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM group_files WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_file(&row)
    }

    pub async fn list_files(&self, group_id: &str) -> Result<Vec<GroupFile>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM group_files WHERE group_id = ?1 \
                     ORDER BY created_at DESC, id"
                ),
                [group_id],
            )
            .await?;
        collect_rows(rows, row_to_file).await
    }

    /// Delete file metadata. The uploader or the group owner may delete.
    pub async fn delete_file(&self, actor_id: &str, file_id: &str) -> Result<(), DatabaseError> {
        let file = self.get_file(file_id).await?;
        if file.uploader_id != actor_id
            && self.member_role(&file.group_id, actor_id).await? != Some(MemberRole::Owner)
        {
            return Err(DatabaseError::Forbidden(
                "only the uploader or the group owner can delete a file".into(),
            ));
        }
        self.execute("DELETE FROM group_files WHERE id = ?1", [file_id]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{group_with, profile, test_service};
    use pretty_assertions::assert_eq;

    fn notes_pdf() -> NewFile {
        NewFile {
            name: "notes.pdf".into(),
            url: "https://files/notes.pdf".into(),
            size_bytes: 2048,
            mime_type: Some("application/pdf".into()),
        }
    }

    #[tokio::test]
    async fn register_and_list() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let g = group_with(&svc, &ada, &[]).await;
        let f = svc.register_file(&ada.id, &g.id, notes_pdf()).await.unwrap();
        assert!(f.id.starts_with("fil-"));
        assert_eq!(svc.list_files(&g.id).await.unwrap(), vec![f]);
    }

    #[tokio::test]
    async fn owner_or_uploader_deletes() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let bo = profile(&svc, "Bo").await;
        let cy = profile(&svc, "Cy").await;
        let g = group_with(&svc, &ada, &[&bo, &cy]).await;

        let f1 = svc.register_file(&bo.id, &g.id, notes_pdf()).await.unwrap();
        assert!(matches!(
            svc.delete_file(&cy.id, &f1.id).await,
            Err(DatabaseError::Forbidden(_))
        ));
        svc.delete_file(&ada.id, &f1.id).await.unwrap();

        let f2 = svc.register_file(&bo.id, &g.id, notes_pdf()).await.unwrap();
        svc.delete_file(&bo.id, &f2.id).await.unwrap();
        assert!(svc.list_files(&g.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn negative_size_rejected() {
        let svc = test_service().await;
        let ada = profile(&svc, "Ada").await;
        let g = group_with(&svc, &ada, &[]).await;
        let bad = NewFile {
            size_bytes: -1,
            ..notes_pdf()
        };
        assert!(matches!(
            svc.register_file(&ada.id, &g.id, bad).await,
            Err(DatabaseError::Validation(_))
        ));
    }
}
