use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Explicit session ID, else the acting user's active session.
async fn resolve_session_id(explicit: Option<&str>, ctx: &AppContext) -> anyhow::Result<String> {
    if let Some(id) = explicit {
        return Ok(id.to_string());
    }
    let user_id = ctx.require_user()?;
    ctx.service
        .active_study_session(user_id)
        .await?
        .map(|session| session.id)
        .ok_or_else(|| anyhow::anyhow!("No active session. Run 'hall session start' first."))
}

pub async fn stop(id: Option<&str>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let user_id = ctx.require_user()?;
    let session_id = resolve_session_id(id, ctx).await?;
    let response = ctx.service.stop_study_session(user_id, &session_id).await?;
    output(&response, flags.format)
}

pub async fn cancel(id: Option<&str>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let user_id = ctx.require_user()?;
    let session_id = resolve_session_id(id, ctx).await?;
    let session = ctx
        .service
        .cancel_study_session(user_id, &session_id)
        .await?;
    output(&session, flags.format)
}
