use hall_core::entities::Activity;
use serde::Serialize;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ActivityCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ActivityListResponse {
    activities: Vec<Activity>,
}

/// Handle `hall activity`.
pub async fn handle(
    action: &ActivityCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ActivityCommands::Post {
            group,
            image_url,
            caption,
        } => {
            let user_id = ctx.require_user()?;
            let activity = ctx
                .service
                .post_activity(user_id, group, image_url, caption.as_deref())
                .await?;
            output(&activity, flags.format)
        }
        ActivityCommands::List { group, limit } => {
            let user_id = ctx.require_user()?;
            ctx.service.require_member(group, user_id).await?;
            let activities = ctx
                .service
                .list_activities(group, ctx.limit(*limit, flags))
                .await?;
            output(&ActivityListResponse { activities }, flags.format)
        }
        ActivityCommands::Delete { id } => {
            let user_id = ctx.require_user()?;
            ctx.service.delete_activity(user_id, id).await?;
            output(&json!({ "deleted": id }), flags.format)
        }
    }
}
