use chrono::Utc;
use hall_core::responses::DailyStudyTotal;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Longest window `hall session daily` accepts.
const MAX_DAYS: u32 = 366;

#[derive(Debug, Serialize)]
struct DailyTotalsResponse {
    total_minutes: i64,
    days: Vec<DailyStudyTotal>,
}

pub async fn run(days: u32, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if days == 0 || days > MAX_DAYS {
        anyhow::bail!("--days must be between 1 and {MAX_DAYS}, got {days}");
    }
    let user_id = ctx.require_user()?;
    let days = ctx
        .service
        .daily_study_totals(user_id, days, Utc::now().date_naive())
        .await?;
    let total_minutes = days.iter().map(|day| day.minutes).sum();
    output(
        &DailyTotalsResponse {
            total_minutes,
            days,
        },
        flags.format,
    )
}
