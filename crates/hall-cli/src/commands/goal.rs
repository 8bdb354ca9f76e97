mod create;
mod list;
mod update;

use hall_core::enums::GoalStatus;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::GoalCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `hall goal`.
pub async fn handle(
    action: &GoalCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        GoalCommands::Create {
            group,
            title,
            unit,
            target,
            subject,
            deadline,
        } => {
            create::run(
                group,
                title,
                unit,
                *target,
                subject.as_deref(),
                deadline.as_deref(),
                ctx,
                flags,
            )
            .await
        }
        GoalCommands::List { group, status } => {
            list::run(group, status.as_deref(), ctx, flags).await
        }
        GoalCommands::Show { id } => output(&ctx.service.get_goal(id).await?, flags.format),
        GoalCommands::Update {
            id,
            title,
            target,
            deadline,
            clear_deadline,
            subject,
            clear_subject,
        } => {
            let fields = update::UpdateFields {
                title: title.as_deref(),
                target: *target,
                deadline: deadline.as_deref(),
                clear_deadline: *clear_deadline,
                subject: subject.as_deref(),
                clear_subject: *clear_subject,
            };
            update::run(id, &fields, ctx, flags).await
        }
        GoalCommands::Progress { id, delta } => {
            let user_id = ctx.require_user()?;
            let response = ctx.service.update_goal_progress(user_id, id, *delta).await?;
            output(&response, flags.format)
        }
        GoalCommands::Archive { id } => transition(id, GoalStatus::Archived, ctx, flags).await,
        GoalCommands::Complete { id } => transition(id, GoalStatus::Completed, ctx, flags).await,
        GoalCommands::Delete { id } => {
            let user_id = ctx.require_user()?;
            ctx.service.delete_goal(user_id, id).await?;
            output(&json!({ "deleted": id }), flags.format)
        }
    }
}

async fn transition(
    id: &str,
    status: GoalStatus,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let user_id = ctx.require_user()?;
    let goal = ctx.service.transition_goal(user_id, id, status).await?;
    output(&goal, flags.format)
}
