use hall_core::entities::Invitation;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::InviteCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct InvitationListResponse {
    invitations: Vec<Invitation>,
}

/// Handle `hall invite`.
pub async fn handle(
    action: &InviteCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        InviteCommands::Send { group, invitee } => {
            let user_id = ctx.require_user()?;
            let invitation = ctx.service.send_invitation(user_id, group, invitee).await?;
            output(&invitation, flags.format)
        }
        InviteCommands::List { all } => {
            let user_id = ctx.require_user()?;
            let invitations = ctx
                .service
                .list_invitations_for_user(user_id, !*all)
                .await?;
            output(&InvitationListResponse { invitations }, flags.format)
        }
        InviteCommands::Group { id } => {
            let user_id = ctx.require_user()?;
            ctx.service.require_member(id, user_id).await?;
            let invitations = ctx.service.list_group_invitations(id).await?;
            output(&InvitationListResponse { invitations }, flags.format)
        }
        InviteCommands::Accept { id } => respond(id, true, ctx, flags).await,
        InviteCommands::Decline { id } => respond(id, false, ctx, flags).await,
        InviteCommands::Cancel { id } => {
            let user_id = ctx.require_user()?;
            let invitation = ctx.service.cancel_invitation(user_id, id).await?;
            output(&invitation, flags.format)
        }
    }
}

async fn respond(
    id: &str,
    accept: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let user_id = ctx.require_user()?;
    let invitation = ctx
        .service
        .respond_to_invitation(user_id, id, accept)
        .await?;
    output(&invitation, flags.format)
}
