use hall_core::entities::Subject;
use serde::Serialize;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SubjectCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SubjectListResponse {
    subjects: Vec<Subject>,
}

/// Handle `hall subject`.
pub async fn handle(
    action: &SubjectCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SubjectCommands::Create { group, name, color } => {
            let user_id = ctx.require_user()?;
            let subject = ctx
                .service
                .create_subject(user_id, group, name, color.as_deref())
                .await?;
            output(&subject, flags.format)
        }
        SubjectCommands::List { group } => {
            let subjects = ctx.service.list_subjects(group).await?;
            output(&SubjectListResponse { subjects }, flags.format)
        }
        SubjectCommands::Delete { id } => {
            let user_id = ctx.require_user()?;
            ctx.service.delete_subject(user_id, id).await?;
            output(&json!({ "deleted": id }), flags.format)
        }
    }
}
