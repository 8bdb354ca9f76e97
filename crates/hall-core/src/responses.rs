//! Composite response types returned as JSON by the CLI and the server.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Achievement, Goal, PointsEntry, Profile, StudySession};
use crate::enums::{AchievementKind, LeaderboardPeriod};
use crate::leaderboard::{LeaderboardEntry, RankChange};
use crate::water::WaterProgress;

/// Response from a goal progress update.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GoalProgressResponse {
    pub goal: Goal,
    /// Amount of the requested delta that counted.
    pub applied: i64,
    pub points_awarded: i64,
    pub completed: bool,
    pub achievements: Vec<AchievementKind>,
}

/// Response from stopping or logging a study session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SessionCompleteResponse {
    pub session: StudySession,
    pub points: Option<PointsEntry>,
    pub goals: AutoUpdateGoalsResponse,
    pub achievements: Vec<AchievementKind>,
}

/// Response from the `auto-update-goals` function.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AutoUpdateGoalsResponse {
    pub session_id: String,
    pub minutes: i64,
    pub updated: Vec<GoalProgressResponse>,
    pub failed: Vec<FailedItem>,
}

/// A batch item that could not be processed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FailedItem {
    pub id: String,
    pub error: String,
}

/// A ranked leaderboard view.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LeaderboardResponse {
    /// `None` for the global board.
    pub group_id: Option<String>,
    pub period: LeaderboardPeriod,
    pub entries: Vec<LeaderboardEntry>,
}

/// Changes detected for one group by `check-leaderboard-changes`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GroupRankChanges {
    pub group_id: String,
    pub changes: Vec<RankChange>,
    pub notifications_sent: u32,
}

/// Response from the `check-leaderboard-changes` function.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LeaderboardChangesResponse {
    pub groups: Vec<GroupRankChanges>,
    pub failed: Vec<FailedItem>,
}

/// Response from the `water-reminder` function.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct WaterReminderResponse {
    pub date: NaiveDate,
    pub reminded: Vec<String>,
    pub failed: Vec<FailedItem>,
}

/// Water intake summary for one user and day.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct WaterDayResponse {
    pub user_id: String,
    pub date: NaiveDate,
    pub progress: WaterProgress,
    pub achievements: Vec<AchievementKind>,
}

/// Minutes studied on one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DailyStudyTotal {
    pub date: NaiveDate,
    pub minutes: i64,
    pub sessions: i64,
}

/// Profile page data.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProfileStatsResponse {
    pub profile: Profile,
    pub total_points: i64,
    pub total_minutes: i64,
    pub completed_sessions: i64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub goals_completed: i64,
    pub achievements: Vec<Achievement>,
}
