use hall_core::entities::{Group, GroupMember};
use hall_core::enums::MemberRole;
use hall_db::updates::group::GroupUpdateBuilder;
use serde::Serialize;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::GroupCommands;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct GroupListResponse {
    groups: Vec<Group>,
}

#[derive(Debug, Serialize)]
struct MemberListResponse {
    members: Vec<GroupMember>,
}

/// Handle `hall group`.
pub async fn handle(
    action: &GroupCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        GroupCommands::Create { name, description } => {
            let user_id = ctx.require_user()?;
            let group = ctx
                .service
                .create_group(user_id, name, description.as_deref())
                .await?;
            output(&group, flags.format)
        }
        GroupCommands::List { limit } => {
            let user_id = ctx.require_user()?;
            let groups = ctx
                .service
                .list_groups_for_user(user_id, ctx.limit(*limit, flags))
                .await?;
            output(&GroupListResponse { groups }, flags.format)
        }
        GroupCommands::Show { id } => output(&ctx.service.get_group(id).await?, flags.format),
        GroupCommands::Update {
            id,
            name,
            description,
        } => {
            let user_id = ctx.require_user()?;
            if name.is_none() && description.is_none() {
                anyhow::bail!("nothing to update: pass --name or --description");
            }
            let mut builder = GroupUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(description) = description {
                let description = Some(description.clone()).filter(|d| !d.trim().is_empty());
                builder = builder.description(description);
            }
            let group = ctx.service.update_group(user_id, id, builder.build()).await?;
            output(&group, flags.format)
        }
        GroupCommands::Delete { id } => {
            let user_id = ctx.require_user()?;
            ctx.service.delete_group(user_id, id).await?;
            output(&json!({ "deleted": id }), flags.format)
        }
        GroupCommands::Join { code } => {
            let user_id = ctx.require_user()?;
            let member = ctx.service.join_group(user_id, code).await?;
            output(&member, flags.format)
        }
        GroupCommands::Leave { id } => {
            let user_id = ctx.require_user()?;
            ctx.service.leave_group(user_id, id).await?;
            output(&json!({ "left": id }), flags.format)
        }
        GroupCommands::Members { id } => {
            let members = ctx.service.list_members(id).await?;
            output(&MemberListResponse { members }, flags.format)
        }
        GroupCommands::Role { id, user, role } => {
            let actor = ctx.require_user()?;
            let role: MemberRole = parse_enum(role, "role")?;
            ctx.service.set_member_role(actor, id, user, role).await?;
            output(
                &json!({ "group_id": id, "user_id": user, "role": role }),
                flags.format,
            )
        }
    }
}
