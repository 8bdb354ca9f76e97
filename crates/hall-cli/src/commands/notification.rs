use hall_core::entities::Notification;
use serde::Serialize;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::NotificationCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct NotificationListResponse {
    notifications: Vec<Notification>,
}

/// Handle `hall notifications`.
pub async fn handle(
    action: &NotificationCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let user_id = ctx.require_user()?;
    match action {
        NotificationCommands::List { unread, limit } => {
            let notifications = ctx
                .service
                .list_notifications(user_id, *unread, ctx.limit(*limit, flags))
                .await?;
            output(&NotificationListResponse { notifications }, flags.format)
        }
        NotificationCommands::Read { id } => {
            ctx.service.mark_notification_read(user_id, id).await?;
            output(&json!({ "read": id }), flags.format)
        }
        NotificationCommands::ReadAll => {
            let marked = ctx.service.mark_all_notifications_read(user_id).await?;
            output(&json!({ "marked": marked }), flags.format)
        }
        NotificationCommands::Count => {
            let unread = ctx.service.unread_notification_count(user_id).await?;
            output(&json!({ "unread": unread }), flags.format)
        }
    }
}
