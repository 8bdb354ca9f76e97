use hall_core::entities::WaterIntake;
use serde::Serialize;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::WaterCommands;
use crate::commands::shared::parse::date_or_today;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct WaterListResponse {
    entries: Vec<WaterIntake>,
}

/// Handle `hall water`.
pub async fn handle(
    action: &WaterCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let user_id = ctx.require_user()?;
    match action {
        WaterCommands::Log { ml } => {
            let day = ctx.service.log_water(user_id, *ml).await?;
            output(&day, flags.format)
        }
        WaterCommands::Today { date } => {
            let date = date_or_today(date.as_deref(), "date")?;
            output(&ctx.service.water_day(user_id, date).await?, flags.format)
        }
        WaterCommands::List { date } => {
            let date = date_or_today(date.as_deref(), "date")?;
            let entries = ctx.service.list_water_intake(user_id, date).await?;
            output(&WaterListResponse { entries }, flags.format)
        }
        WaterCommands::Delete { id } => {
            ctx.service.delete_water_intake(user_id, id).await?;
            output(&json!({ "deleted": id }), flags.format)
        }
    }
}
