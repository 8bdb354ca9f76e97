//! Group membership: join by invite code, leave, roles.

use chrono::Utc;

use hall_core::entities::GroupMember;
use hall_core::enums::MemberRole;

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, fmt_ts, parse_datetime, parse_enum};
use crate::service::HallService;

fn row_to_member(row: &libsql::Row) -> Result<GroupMember, DatabaseError> {
    Ok(GroupMember {
        group_id: row.get(0)?,
        user_id: row.get(1)?,
        display_name: row.get(2)?,
        role: parse_enum(&row.get::<String>(3)?)?,
        joined_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl HallService {
    /// The user's role in the group, or `None` when not a member.
    pub async fn member_role(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<Option<MemberRole>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT role FROM group_members WHERE group_id = ?1 AND user_id = ?2",
                [group_id, user_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(parse_enum(&row.get::<String>(0)?)?)),
            None => Ok(None),
        }
    }

    /// Fail with `Forbidden` unless the user belongs to the group.
    pub async fn require_member(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<MemberRole, DatabaseError> {
        self.member_role(group_id, user_id).await?.ok_or_else(|| {
            DatabaseError::Forbidden(format!("{user_id} is not a member of {group_id}"))
        })
    }

    /// Fail with `Forbidden` unless the user is an owner or admin of the group.
    pub async fn require_manager(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<MemberRole, DatabaseError> {
        let role = self.require_member(group_id, user_id).await?;
        if !role.can_manage() {
            return Err(DatabaseError::Forbidden(format!(
                "{user_id} must be an owner or admin of {group_id}"
            )));
        }
        Ok(role)
    }

    /// Join the group holding `invite_code` as a plain member.
    pub async fn join_group(
        &self,
        user_id: &str,
        invite_code: &str,
    ) -> Result<GroupMember, DatabaseError> {
        let group = self.get_group_by_invite_code(invite_code).await?;
        if self.member_role(&group.id, user_id).await?.is_some() {
            return Err(DatabaseError::Validation(format!(
                "{user_id} is already a member of {}",
                group.id
            )));
        }
        let profile = self.get_profile(user_id).await?;
        let now = Utc::now();
        self.execute(
            "INSERT INTO group_members (group_id, user_id, role, joined_at) VALUES (?1, ?2, ?3, ?4)",
            libsql::params![
                group.id.as_str(),
                user_id,
                MemberRole::Member.as_str(),
                fmt_ts(now)
            ],
        )
        .await?;

        tracing::info!(group = %group.id, user = user_id, "member joined");
        Ok(GroupMember {
            group_id: group.id,
            user_id: user_id.to_string(),
            display_name: profile.display_name,
            role: MemberRole::Member,
            joined_at: now,
        })
    }

    /// Leave a group. The owner cannot leave; they delete the group instead.
    pub async fn leave_group(&self, user_id: &str, group_id: &str) -> Result<(), DatabaseError> {
        match self.require_member(group_id, user_id).await? {
            MemberRole::Owner => Err(DatabaseError::InvalidState(
                "the owner cannot leave a group".into(),
            )),
            _ => {
                self.execute(
                    "DELETE FROM group_members WHERE group_id = ?1 AND user_id = ?2",
                    [group_id, user_id],
                )
                .await?;
                tracing::info!(group = group_id, user = user_id, "member left");
                Ok(())
            }
        }
    }

    /// Members with their display names, owner first.
    pub async fn list_members(&self, group_id: &str) -> Result<Vec<GroupMember>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                "SELECT m.group_id, m.user_id, p.display_name, m.role, m.joined_at
                 FROM group_members m JOIN profiles p ON p.id = m.user_id
                 WHERE m.group_id = ?1
                 ORDER BY CASE m.role WHEN 'owner' THEN 0 WHEN 'admin' THEN 1 ELSE 2 END,
                          m.joined_at, m.user_id",
                [group_id],
            )
            .await?;
        collect_rows(rows, row_to_member).await
    }

    /// Promote or demote a member. Owner only; ownership itself cannot move.
    pub async fn set_member_role(
        &self,
        actor_id: &str,
        group_id: &str,
        user_id: &str,
        role: MemberRole,
    ) -> Result<(), DatabaseError> {
        if self.require_member(group_id, actor_id).await? != MemberRole::Owner {
            return Err(DatabaseError::Forbidden(
                "only the owner can change roles".into(),
            ));
        }
        if role == MemberRole::Owner {
            return Err(DatabaseError::Validation(
                "ownership cannot be transferred".into(),
            ));
        }
        let current = self.member_role(group_id, user_id).await?.ok_or(DatabaseError::NoResult)?;
        if current == MemberRole::Owner {
            return Err(DatabaseError::InvalidState("the owner's role is fixed".into()));
        }
        self.execute(
            "UPDATE group_members SET role = ?1 WHERE group_id = ?2 AND user_id = ?3",
            libsql::params![role.as_str(), group_id, user_id],
        )
        .await?;
        Ok(())
    }
}
