use chrono::Utc;
use hall_core::enums::LeaderboardPeriod;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::LeaderboardArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `hall leaderboard`.
pub async fn handle(
    args: &LeaderboardArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let period: LeaderboardPeriod = parse_enum(&args.period, "period")?;
    let limit = args.limit.or(flags.limit);
    let board = ctx
        .service
        .leaderboard(args.group.as_deref(), period, Utc::now(), limit)
        .await?;
    output(&board, flags.format)
}
