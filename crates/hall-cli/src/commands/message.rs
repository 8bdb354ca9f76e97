use hall_core::entities::Message;
use serde::Serialize;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::MessageCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct MessageListResponse {
    messages: Vec<Message>,
}

/// Handle `hall message`.
pub async fn handle(
    action: &MessageCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let user_id = ctx.require_user()?;
    match action {
        MessageCommands::Send { group, content } => {
            let message = ctx.service.send_message(user_id, group, content).await?;
            output(&message, flags.format)
        }
        MessageCommands::List { group, limit } => {
            let messages = ctx
                .service
                .list_messages(user_id, group, ctx.limit(*limit, flags))
                .await?;
            output(&MessageListResponse { messages }, flags.format)
        }
        MessageCommands::Delete { id } => {
            ctx.service.delete_message(user_id, id).await?;
            output(&json!({ "deleted": id }), flags.format)
        }
    }
}
