use hall_core::entities::GroupFile;
use hall_db::repos::file::NewFile;
use serde::Serialize;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::FileCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct FileListResponse {
    files: Vec<GroupFile>,
}

/// Handle `hall file`.
pub async fn handle(
    action: &FileCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let user_id = ctx.require_user()?;
    match action {
        FileCommands::Add {
            group,
            name,
            url,
            size,
            mime_type,
        } => {
            let file = ctx
                .service
                .register_file(
                    user_id,
                    group,
                    NewFile {
                        name: name.clone(),
                        url: url.clone(),
                        size_bytes: *size,
                        mime_type: mime_type.clone(),
                    },
                )
                .await?;
            output(&file, flags.format)
        }
        FileCommands::List { group } => {
            ctx.service.require_member(group, user_id).await?;
            let files = ctx.service.list_files(group).await?;
            output(&FileListResponse { files }, flags.format)
        }
        FileCommands::Delete { id } => {
            ctx.service.delete_file(user_id, id).await?;
            output(&json!({ "deleted": id }), flags.format)
        }
    }
}
