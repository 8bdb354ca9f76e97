//! Group repository: create, read, update, delete and invite-code lookup.

use chrono::Utc;

use hall_core::entities::Group;
use hall_core::enums::MemberRole;
use hall_core::ids::PREFIX_GROUP;

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, fmt_ts, get_opt_string, parse_datetime};
use crate::service::HallService;
use crate::updates::SetClauses;
use crate::updates::group::GroupUpdate;

const SELECT_COLS: &str = "id, name, description, owner_id, invite_code, created_at, updated_at";

fn row_to_group(row: &libsql::Row) -> Result<Group, DatabaseError> {
    Ok(Group {
        id: row.get(0)?,
        name: row.get(1)?,
        description: get_opt_string(row, 2)?,
        owner_id: row.get(3)?,
        invite_code: row.get(4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

fn validate_group_name(name: &str) -> Result<&str, DatabaseError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DatabaseError::Validation("group name must not be empty".into()));
    }
    Ok(trimmed)
}

impl HallService {
    /// Create a group. The creator becomes its `owner` member.
    pub async fn create_group(
        &self,
        owner_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Group, DatabaseError> {
        let name = validate_group_name(name)?;
        self.get_profile(owner_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_GROUP).await?;
        let invite_code = self.db().generate_invite_code().await?;

        let _guard = self.write_guard().await;
        let tx = self.db().conn().transaction().await?;
        tx.execute(
            &format!("INSERT INTO study_groups ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            libsql::params![
                id.as_str(),
                name,
                description,
                owner_id,
                invite_code.as_str(),
                fmt_ts(now),
                fmt_ts(now)
            ],
        )
        .await?;
        tx.execute(
            "INSERT INTO group_members (group_id, user_id, role, joined_at) VALUES (?1, ?2, ?3, ?4)",
            libsql::params![id.as_str(), owner_id, MemberRole::Owner.as_str(), fmt_ts(now)],
        )
        .await?;
        tx.commit().await?;

        tracing::info!(group = %id, owner = owner_id, "group created");
        Ok(Group {
            id,
            name: name.to_string(),
            description: description.map(String::from),
            owner_id: owner_id.to_string(),
            invite_code,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_group(&self, id: &str) -> Result<Group, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM study_groups WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_group(&row)
    }

    /// Look up a group by invite code (case-insensitive).
    pub async fn get_group_by_invite_code(&self, code: &str) -> Result<Group, DatabaseError> {
        let code = code.trim().to_ascii_uppercase();
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM study_groups WHERE invite_code = ?1"),
                [code.as_str()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_group(&row)
    }

    /// Groups the user is a member of, most recently joined first.
    pub async fn list_groups_for_user(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<Group>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT g.id, g.name, g.description, g.owner_id, g.invite_code, \
                     g.created_at, g.updated_at \
                     FROM study_groups g JOIN group_members m ON m.group_id = g.id \
                     WHERE m.user_id = ?1 ORDER BY m.joined_at DESC, g.id LIMIT {limit}"
                ),
                [user_id],
            )
            .await?;
        collect_rows(rows, row_to_group).await
    }

    /// Every group ID, for batch jobs.
    pub async fn list_group_ids(&self) -> Result<Vec<String>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query("SELECT id FROM study_groups ORDER BY id", ())
            .await?;
        collect_rows(rows, |row| Ok(row.get::<String>(0)?)).await
    }

    /// Rename or re-describe a group. Owner or admin only.
    pub async fn update_group(
        &self,
        actor_id: &str,
        group_id: &str,
        update: GroupUpdate,
    ) -> Result<Group, DatabaseError> {
        self.require_manager(group_id, actor_id).await?;

        let mut clauses = SetClauses::default();
        if let Some(ref name) = update.name {
            clauses.push("name", validate_group_name(name)?.to_string());
        }
        if let Some(ref description) = update.description {
            clauses.push(
                "description",
                description.clone().map_or(libsql::Value::Null, Into::into),
            );
        }
        if clauses.is_empty() {
            return self.get_group(group_id).await;
        }
        clauses.push("updated_at", fmt_ts(Utc::now()));

        let (sql, params) = clauses.into_update("study_groups", group_id);
        self.execute(&sql, libsql::params_from_iter(params)).await?;
        self.get_group(group_id).await
    }

    /// Delete a group and everything scoped to it. Owner only.
    pub async fn delete_group(&self, actor_id: &str, group_id: &str) -> Result<(), DatabaseError> {
        let group = self.get_group(group_id).await?;
        if group.owner_id != actor_id {
            return Err(DatabaseError::Forbidden(
                "only the owner can delete a group".into(),
            ));
        }
        self.execute("DELETE FROM study_groups WHERE id = ?1", [group_id]).await?;
        tracing::info!(group = group_id, "group deleted");
        Ok(())
    }
}
