mod daily;
mod stop;

use hall_core::entities::StudySession;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SessionCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SessionListResponse {
    sessions: Vec<StudySession>,
}

#[derive(Debug, Serialize)]
struct ActiveSessionResponse {
    active: Option<StudySession>,
}

/// Handle `hall session`.
pub async fn handle(
    action: &SessionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SessionCommands::Start {
            group,
            subject,
            notes,
        } => {
            let user_id = ctx.require_user()?;
            let session = ctx
                .service
                .start_study_session(
                    user_id,
                    group.as_deref(),
                    subject.as_deref(),
                    notes.as_deref(),
                )
                .await?;
            output(&session, flags.format)
        }
        SessionCommands::Stop { id } => stop::stop(id.as_deref(), ctx, flags).await,
        SessionCommands::Cancel { id } => stop::cancel(id.as_deref(), ctx, flags).await,
        SessionCommands::Log {
            minutes,
            group,
            subject,
            notes,
        } => {
            let user_id = ctx.require_user()?;
            let response = ctx
                .service
                .log_study_session(
                    user_id,
                    group.as_deref(),
                    subject.as_deref(),
                    *minutes,
                    notes.as_deref(),
                )
                .await?;
            output(&response, flags.format)
        }
        SessionCommands::Active => {
            let user_id = ctx.require_user()?;
            let active = ctx.service.active_study_session(user_id).await?;
            output(&ActiveSessionResponse { active }, flags.format)
        }
        SessionCommands::List { limit } => {
            let user_id = ctx.require_user()?;
            let sessions = ctx
                .service
                .list_study_sessions(user_id, ctx.limit(*limit, flags))
                .await?;
            output(&SessionListResponse { sessions }, flags.format)
        }
        SessionCommands::Daily { days } => daily::run(*days, ctx, flags).await,
    }
}
