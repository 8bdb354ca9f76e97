use hall_core::enums::GoalUnit;
use hall_db::repos::goal::NewGoal;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::{parse_date, parse_enum};
use crate::context::AppContext;
use crate::output::output;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    group: &str,
    title: &str,
    unit: &str,
    target: i64,
    subject: Option<&str>,
    deadline: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let user_id = ctx.require_user()?;
    let unit: GoalUnit = parse_enum(unit, "unit")?;
    let deadline = deadline
        .map(|value| parse_date(value, "deadline"))
        .transpose()?;

    let goal = ctx
        .service
        .create_goal(
            user_id,
            group,
            NewGoal {
                title: title.to_string(),
                unit,
                target,
                subject_id: subject.map(str::to_string),
                deadline,
            },
        )
        .await?;

    output(&goal, flags.format)
}
