use schemars::{JsonSchema, schema_for};
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

fn schema_of<T: JsonSchema>() -> anyhow::Result<Value> {
    Ok(serde_json::to_value(schema_for!(T))?)
}

/// Names accepted by `hall schema`, in listing order.
const TYPE_NAMES: &[&str] = &[
    "profile",
    "group",
    "group_member",
    "subject",
    "goal",
    "study_session",
    "points_entry",
    "water_intake",
    "achievement",
    "notification",
    "invitation",
    "message",
    "group_file",
    "activity",
    "leaderboard_entry",
    "goal_progress_response",
    "session_complete_response",
    "auto_update_goals_response",
    "leaderboard_response",
    "leaderboard_changes_response",
    "water_reminder_response",
    "water_day_response",
    "profile_stats_response",
    "quiz_request",
    "quiz_response",
];

fn lookup(name: &str) -> anyhow::Result<Value> {
    use hall_core::{entities, leaderboard, responses};

    match name {
        "profile" => schema_of::<entities::Profile>(),
        "group" => schema_of::<entities::Group>(),
        "group_member" => schema_of::<entities::GroupMember>(),
        "subject" => schema_of::<entities::Subject>(),
        "goal" => schema_of::<entities::Goal>(),
        "study_session" => schema_of::<entities::StudySession>(),
        "points_entry" => schema_of::<entities::PointsEntry>(),
        "water_intake" => schema_of::<entities::WaterIntake>(),
        "achievement" => schema_of::<entities::Achievement>(),
        "notification" => schema_of::<entities::Notification>(),
        "invitation" => schema_of::<entities::Invitation>(),
        "message" => schema_of::<entities::Message>(),
        "group_file" => schema_of::<entities::GroupFile>(),
        "activity" => schema_of::<entities::Activity>(),
        "leaderboard_entry" => schema_of::<leaderboard::LeaderboardEntry>(),
        "goal_progress_response" => schema_of::<responses::GoalProgressResponse>(),
        "session_complete_response" => schema_of::<responses::SessionCompleteResponse>(),
        "auto_update_goals_response" => schema_of::<responses::AutoUpdateGoalsResponse>(),
        "leaderboard_response" => schema_of::<responses::LeaderboardResponse>(),
        "leaderboard_changes_response" => schema_of::<responses::LeaderboardChangesResponse>(),
        "water_reminder_response" => schema_of::<responses::WaterReminderResponse>(),
        "water_day_response" => schema_of::<responses::WaterDayResponse>(),
        "profile_stats_response" => schema_of::<responses::ProfileStatsResponse>(),
        "quiz_request" => schema_of::<hall_quiz::QuizRequest>(),
        "quiz_response" => schema_of::<hall_quiz::QuizResponse>(),
        other => anyhow::bail!(
            "unknown schema type '{other}'. Run 'hall schema --list' for registered names."
        ),
    }
}

/// Handle `hall schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    if args.list {
        return output(&TYPE_NAMES, flags.format);
    }
    let Some(name) = args.type_name.as_deref() else {
        anyhow::bail!("pass a type name or --list");
    };
    output(&lookup(&name.replace('-', "_"))?, flags.format)
}
