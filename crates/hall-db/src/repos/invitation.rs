//! Invitation repository.
//!
//! Lifecycle: `pending -> accepted | declined | cancelled`. Accepting adds the
//! invitee to the group in the same transaction as the status change.

use chrono::Utc;

use hall_core::entities::Invitation;
use hall_core::enums::{InvitationStatus, MemberRole, NotificationKind};
use hall_core::ids::PREFIX_INVITATION;

use crate::error::DatabaseError;
use crate::helpers::{collect_rows, fmt_ts, get_opt_string, parse_datetime, parse_enum, parse_optional_datetime};
use crate::repos::notification::NewNotification;
use crate::service::HallService;

const SELECT_COLS: &str = "id, group_id, inviter_id, invitee_id, status, created_at, responded_at";

fn row_to_invitation(row: &libsql::Row) -> Result<Invitation, DatabaseError> {
    Ok(Invitation {
        id: row.get(0)?,
        group_id: row.get(1)?,
        inviter_id: row.get(2)?,
        invitee_id: row.get(3)?,
        status: parse_enum(&row.get::<String>(4)?)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        responded_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
    })
}

impl HallService {
    /// Invite a user into a group and notify them.
    pub async fn send_invitation(
        &self,
        inviter_id: &str,
        group_id: &str,
        invitee_id: &str,
    ) -> Result<Invitation, DatabaseError> {
        self.require_member(group_id, inviter_id).await?;
        self.get_profile(invitee_id).await?;
        if self.member_role(group_id, invitee_id).await?.is_some() {
            return Err(DatabaseError::Validation(format!(
                "{invitee_id} is already a member of {group_id}"
            )));
        }
        let mut pending = self
            .db()
            .conn()
            .query(
                "SELECT 1 FROM invitations WHERE group_id = ?1 AND invitee_id = ?2 AND status = 'pending'",
                [group_id, invitee_id],
            )
            .await?;
        if pending.next().await?.is_some() {
            return Err(DatabaseError::Validation(format!(
                "{invitee_id} already has a pending invitation to {group_id}"
            )));
        }

        let group = self.get_group(group_id).await?;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_INVITATION).await?;
        self.execute(
            &format!("INSERT INTO invitations ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL)"),
            libsql::params![
                id.as_str(),
                group_id,
                inviter_id,
                invitee_id,
                InvitationStatus::Pending.as_str(),
                fmt_ts(now)
            ],
        )
        .await?;

        let title = format!("You were invited to {}", group.name);
        self.create_notification(
            invitee_id,
            &NewNotification {
                kind: NotificationKind::Invitation,
                title: &title,
                body: None,
                reference_id: Some(&id),
            },
        )
        .await?;

        Ok(Invitation {
            id,
            group_id: group_id.to_string(),
            inviter_id: inviter_id.to_string(),
            invitee_id: invitee_id.to_string(),
            status: InvitationStatus::Pending,
            created_at: now,
            responded_at: None,
        })
    }

    pub async fn get_invitation(&self, id: &str) -> Result<Invitation, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM invitations WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_invitation(&row)
    }

    /// Invitations addressed to the user, newest first.
    pub async fn list_invitations_for_user(
        &self,
        user_id: &str,
        pending_only: bool,
    ) -> Result<Vec<Invitation>, DatabaseError> {
        let filter = if pending_only { " AND status = 'pending'" } else { "" };
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM invitations WHERE invitee_id = ?1{filter} \
                     ORDER BY created_at DESC, id"
                ),
                [user_id],
            )
            .await?;
        collect_rows(rows, row_to_invitation).await
    }

    pub async fn list_group_invitations(
        &self,
        group_id: &str,
    ) -> Result<Vec<Invitation>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM invitations WHERE group_id = ?1 \
                     ORDER BY created_at DESC, id"
                ),
                [group_id],
            )
            .await?;
        collect_rows(rows, row_to_invitation).await
    }

    /// Accept or decline an invitation. Only the invitee may respond.
    pub async fn respond_to_invitation(
        &self,
        user_id: &str,
        invitation_id: &str,
        accept: bool,
    ) -> Result<Invitation, DatabaseError> {
        let current = self.get_invitation(invitation_id).await?;
        if current.invitee_id != user_id {
            return Err(DatabaseError::Forbidden(
                "only the invitee can respond to an invitation".into(),
            ));
        }
        let next = if accept {
            InvitationStatus::Accepted
        } else {
            InvitationStatus::Declined
        };
        self.transition_invitation(current, next).await
    }

    /// Withdraw a pending invitation. Inviter or group owner/admin only.
    pub async fn cancel_invitation(
        &self,
        actor_id: &str,
        invitation_id: &str,
    ) -> Result<Invitation, DatabaseError> {
        let current = self.get_invitation(invitation_id).await?;
        if current.inviter_id != actor_id {
            self.require_manager(&current.group_id, actor_id).await?;
        }
        self.transition_invitation(current, InvitationStatus::Cancelled)
            .await
    }

    async fn transition_invitation(
        &self,
        current: Invitation,
        next: InvitationStatus,
    ) -> Result<Invitation, DatabaseError> {
        current.status.ensure_transition(&current.id, next)?;

        let now = Utc::now();
        let _guard = self.write_guard().await;
        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "UPDATE invitations SET status = ?1, responded_at = ?2 WHERE id = ?3",
            libsql::params![next.as_str(), fmt_ts(now), current.id.as_str()],
        )
        .await?;
        if next == InvitationStatus::Accepted {
            tx.execute(
                "INSERT OR IGNORE INTO group_members (group_id, user_id, role, joined_at)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![
                    current.group_id.as_str(),
                    current.invitee_id.as_str(),
                    MemberRole::Member.as_str(),
                    fmt_ts(now)
                ],
            )
            .await?;
        }
        tx.commit().await?;

        tracing::info!(invitation = %current.id, status = %next, "invitation updated");
        Ok(Invitation {
            status: next,
            responded_at: Some(now),
            ..current
        })
    }
}
