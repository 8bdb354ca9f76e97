use hall_core::entities::PointsEntry;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PointsArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct PointsResponse {
    total: i64,
    entries: Vec<PointsEntry>,
}

/// Handle `hall points`.
pub async fn handle(args: &PointsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let user_id = ctx.require_user()?;
    let total = ctx.service.total_points(user_id).await?;
    let entries = ctx
        .service
        .list_points(user_id, args.group.as_deref(), ctx.limit(args.limit, flags))
        .await?;
    output(&PointsResponse { total, entries }, flags.format)
}
