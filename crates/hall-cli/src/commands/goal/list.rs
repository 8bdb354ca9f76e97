use hall_core::entities::Goal;
use hall_core::enums::GoalStatus;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct GoalRow {
    #[serde(flatten)]
    goal: Goal,
    percent: u8,
}

#[derive(Debug, Serialize)]
struct GoalListResponse {
    goals: Vec<GoalRow>,
}

pub async fn run(
    group: &str,
    status: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let status = status
        .map(|value| parse_enum::<GoalStatus>(value, "status"))
        .transpose()?;
    let goals = ctx
        .service
        .list_goals(group, status)
        .await?
        .into_iter()
        .map(|goal| GoalRow {
            percent: goal.percent(),
            goal,
        })
        .collect();
    output(&GoalListResponse { goals }, flags.format)
}
