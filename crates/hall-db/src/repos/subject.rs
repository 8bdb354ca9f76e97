//! Subject repository: per-group subjects that goals and sessions refer to.

use chrono::Utc;

use hall_core::entities::Subject;
use hall_core::ids::PREFIX_SUBJECT;

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, fmt_ts, get_opt_string, parse_datetime};
use crate::service::HallService;

const SELECT_COLS: &str = "id, group_id, name, color, created_at";

fn row_to_subject(row: &libsql::Row) -> Result<Subject, DatabaseError> {
    Ok(Subject {
        id: row.get(0)?,
        group_id: row.get(1)?,
        name: row.get(2)?,
        color: get_opt_string(row, 3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl HallService {
    pub async fn create_subject(
        &self,
        actor_id: &str,
        group_id: &str,
        name: &str,
        color: Option<&str>,
    ) -> Result<Subject, DatabaseError> {
        self.require_member(group_id, actor_id).await?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DatabaseError::Validation("subject name must not be empty".into()));
        }
        let mut existing = self
            .db()
            .conn()
            .query(
                "SELECT 1 FROM subjects WHERE group_id = ?1 AND name = ?2",
                [group_id, name],
            )
            .await?;
        if existing.next().await?.is_some() {
            return Err(DatabaseError::Validation(format!(
                "subject '{name}' already exists in {group_id}"
            )));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_SUBJECT).await?;
        self.execute(
            &format!("INSERT INTO subjects ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
            libsql::params![id.as_str(), group_id, name, color, fmt_ts(now)],
        )
        .await?;

        Ok(Subject {
            id,
            group_id: group_id.to_string(),
            name: name.to_string(),
            color: color.map(String::from),
            created_at: now,
        })
    }

    pub async fn get_subject(&self, id: &str) -> Result<Subject, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM subjects WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_subject(&row)
    }

    pub async fn list_subjects(&self, group_id: &str) -> Result<Vec<Subject>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM subjects WHERE group_id = ?1 ORDER BY name"),
                [group_id],
            )
            .await?;
        collect_rows(rows, row_to_subject).await
    }

    /// Delete a subject. Goals and sessions that referenced it keep existing
    /// with no subject.
    pub async fn delete_subject(&self, actor_id: &str, subject_id: &str) -> Result<(), DatabaseError> {
        let subject = self.get_subject(subject_id).await?;
        self.require_manager(&subject.group_id, actor_id).await?;
        self.execute("DELETE FROM subjects WHERE id = ?1", [subject_id]).await?;
        Ok(())
    }
}
