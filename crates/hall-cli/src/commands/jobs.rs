use crate::cli::GlobalFlags;
use crate::cli::subcommands::JobCommands;
use crate::commands::shared::parse::date_or_today;
use crate::context::AppContext;
use crate::output::output;

/// Handle `hall jobs`: the serverless functions, run against the local database.
pub async fn handle(
    action: &JobCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        JobCommands::AutoUpdateGoals { session } => {
            let response = ctx.service.auto_update_goals(session).await?;
            output(&response, flags.format)
        }
        JobCommands::LeaderboardChanges { group } => {
            let response = ctx
                .service
                .check_leaderboard_changes(group.as_deref())
                .await?;
            output(&response, flags.format)
        }
        JobCommands::WaterReminder { date } => {
            let date = date_or_today(date.as_deref(), "date")?;
            let response = ctx.service.water_reminders(date).await?;
            output(&response, flags.format)
        }
    }
}
