//! Achievement rules.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::AchievementKind;

/// Inputs the achievement rules look at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UserStats {
    pub completed_sessions: i64,
    pub current_streak: u32,
    pub total_points: i64,
    pub goals_completed: i64,
    pub met_water_goal_today: bool,
}

/// Every achievement the stats qualify for, in declaration order.
#[must_use]
pub fn earned_achievements(stats: &UserStats) -> Vec<AchievementKind> {
    AchievementKind::ALL
        .into_iter()
        .filter(|kind| qualifies(*kind, stats))
        .collect()
}

/// Kinds the stats qualify for that are not in `already`.
#[must_use]
pub fn newly_earned(stats: &UserStats, already: &[AchievementKind]) -> Vec<AchievementKind> {
    earned_achievements(stats)
        .into_iter()
        .filter(|kind| !already.contains(kind))
        .collect()
}

const fn qualifies(kind: AchievementKind, stats: &UserStats) -> bool {
    match kind {
        AchievementKind::FirstSession => stats.completed_sessions >= 1,
        AchievementKind::Streak3 => stats.current_streak >= 3,
        AchievementKind::Streak7 => stats.current_streak >= 7,
        AchievementKind::Streak30 => stats.current_streak >= 30,
        AchievementKind::Points100 => stats.total_points >= 100,
        AchievementKind::Points1000 => stats.total_points >= 1000,
        AchievementKind::GoalCompleted => stats.goals_completed >= 1,
        AchievementKind::Hydrated => stats.met_water_goal_today,
    }
}
