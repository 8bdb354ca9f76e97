//! Status enums, unit types and notification kinds for Studyhall.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums with state machines provide `allowed_next_states()` to enforce
//! valid transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// GoalUnit
// ---------------------------------------------------------------------------

/// What a goal counts. Each unit carries a fixed points multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GoalUnit {
    Exercises,
    Pages,
    /// Minutes of study time.
    Time,
}

impl GoalUnit {
    /// Points awarded per unit of progress.
    #[must_use]
    pub const fn multiplier(self) -> i64 {
        match self {
            Self::Exercises => 5,
            Self::Pages | Self::Time => 1,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exercises => "exercises",
            Self::Pages => "pages",
            Self::Time => "time",
        }
    }
}

impl fmt::Display for GoalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GoalStatus
// ---------------------------------------------------------------------------

/// Status of a shared goal.
///
/// ```text
/// active → completed → archived
///        → archived
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed,
    Archived,
}

impl GoalStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Active => &[Self::Completed, Self::Archived],
            Self::Completed => &[Self::Archived],
            Self::Archived => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Like [`Self::can_transition_to`], but names the entity on failure.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] when `next` is not reachable.
    pub fn ensure_transition(self, id: &str, next: Self) -> Result<(), CoreError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(CoreError::invalid_transition("goal", id, self, next))
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// Status of a timed study session.
///
/// ```text
/// active → completed
///        → cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
    Cancelled,
}

impl SessionStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Active => &[Self::Completed, Self::Cancelled],
            Self::Completed | Self::Cancelled => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    pub fn ensure_transition(self, id: &str, next: Self) -> Result<(), CoreError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(CoreError::invalid_transition("session", id, self, next))
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MemberRole
// ---------------------------------------------------------------------------

/// Role of a user inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Owner,
    Admin,
    Member,
}

impl MemberRole {
    /// Owners and admins may edit group settings and goals.
    #[must_use]
    pub const fn can_manage(self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// InvitationStatus
// ---------------------------------------------------------------------------

/// Status of a group invitation.
///
/// ```text
/// pending → accepted
///         → declined
///         → cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
    Cancelled,
}

impl InvitationStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Accepted, Self::Declined, Self::Cancelled],
            Self::Accepted | Self::Declined | Self::Cancelled => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    pub fn ensure_transition(self, id: &str, next: Self) -> Result<(), CoreError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(CoreError::invalid_transition("invitation", id, self, next))
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PointsReason
// ---------------------------------------------------------------------------

/// Why a points ledger row was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PointsReason {
    StudySession,
    GoalProgress,
}

impl PointsReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StudySession => "study_session",
            Self::GoalProgress => "goal_progress",
        }
    }
}

impl fmt::Display for PointsReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NotificationKind
// ---------------------------------------------------------------------------

/// Category of an in-app notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Invitation,
    GoalCompleted,
    Achievement,
    RankDropped,
    NewLeader,
    WaterReminder,
    Message,
}

impl NotificationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invitation => "invitation",
            Self::GoalCompleted => "goal_completed",
            Self::Achievement => "achievement",
            Self::RankDropped => "rank_dropped",
            Self::NewLeader => "new_leader",
            Self::WaterReminder => "water_reminder",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AchievementKind
// ---------------------------------------------------------------------------

/// Badges a user can earn once.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    FirstSession,
    #[serde(rename = "streak_3")]
    Streak3,
    #[serde(rename = "streak_7")]
    Streak7,
    #[serde(rename = "streak_30")]
    Streak30,
    #[serde(rename = "points_100")]
    Points100,
    #[serde(rename = "points_1000")]
    Points1000,
    GoalCompleted,
    Hydrated,
}

impl AchievementKind {
    pub const ALL: [Self; 8] = [
        Self::FirstSession,
        Self::Streak3,
        Self::Streak7,
        Self::Streak30,
        Self::Points100,
        Self::Points1000,
        Self::GoalCompleted,
        Self::Hydrated,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstSession => "first_session",
            Self::Streak3 => "streak_3",
            Self::Streak7 => "streak_7",
            Self::Streak30 => "streak_30",
            Self::Points100 => "points_100",
            Self::Points1000 => "points_1000",
            Self::GoalCompleted => "goal_completed",
            Self::Hydrated => "hydrated",
        }
    }

    /// Human-readable title used in notifications.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::FirstSession => "First study session",
            Self::Streak3 => "3-day streak",
            Self::Streak7 => "7-day streak",
            Self::Streak30 => "30-day streak",
            Self::Points100 => "100 points",
            Self::Points1000 => "1000 points",
            Self::GoalCompleted => "Goal completed",
            Self::Hydrated => "Hydrated",
        }
    }
}

impl fmt::Display for AchievementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LeaderboardPeriod
// ---------------------------------------------------------------------------

/// Time window over which points are summed for a leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardPeriod {
    #[default]
    AllTime,
    Week,
    Month,
}

impl LeaderboardPeriod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllTime => "all_time",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for LeaderboardPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RankMovement
// ---------------------------------------------------------------------------

/// How a user's rank moved between two leaderboard observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RankMovement {
    Up,
    Down,
    Same,
    New,
}

impl RankMovement {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Same => "same",
            Self::New => "new",
        }
    }
}

impl fmt::Display for RankMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(unit_exercises, GoalUnit, GoalUnit::Exercises, "exercises");
    test_serde_roundtrip!(
        notification_rank_dropped,
        NotificationKind,
        NotificationKind::RankDropped,
        "rank_dropped"
    );
    test_serde_roundtrip!(
        achievement_streak_7,
        AchievementKind,
        AchievementKind::Streak7,
        "streak_7"
    );
    test_serde_roundtrip!(
        achievement_points_1000,
        AchievementKind,
        AchievementKind::Points1000,
        "points_1000"
    );
    test_serde_roundtrip!(
        period_all_time,
        LeaderboardPeriod,
        LeaderboardPeriod::AllTime,
        "all_time"
    );

    #[test]
    fn multiplier_table() {
        assert_eq!(GoalUnit::Exercises.multiplier(), 5);
        assert_eq!(GoalUnit::Pages.multiplier(), 1);
        assert_eq!(GoalUnit::Time.multiplier(), 1);
    }

    #[test]
    fn achievement_as_str_matches_serde() {
        for kind in AchievementKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn goal_transitions() {
        assert!(GoalStatus::Active.can_transition_to(GoalStatus::Completed));
        assert!(GoalStatus::Completed.can_transition_to(GoalStatus::Archived));
        assert!(!GoalStatus::Completed.can_transition_to(GoalStatus::Active));
        assert!(!GoalStatus::Archived.can_transition_to(GoalStatus::Active));
    }

    #[test]
    fn ensure_transition_names_entity_and_states() {
        assert!(GoalStatus::Active.ensure_transition("gol-1", GoalStatus::Archived).is_ok());
        let err = InvitationStatus::Accepted
            .ensure_transition("inv-1", InvitationStatus::Cancelled)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid state transition: invitation inv-1 from accepted to cancelled"
        );
    }

    #[test]
    fn session_transitions() {
        assert!(SessionStatus::Active.can_transition_to(SessionStatus::Completed));
        assert!(SessionStatus::Active.can_transition_to(SessionStatus::Cancelled));
        assert!(!SessionStatus::Completed.can_transition_to(SessionStatus::Active));
        assert!(!SessionStatus::Cancelled.can_transition_to(SessionStatus::Completed));
    }

    #[test]
    fn invitation_terminal_states() {
        for status in [
            InvitationStatus::Accepted,
            InvitationStatus::Declined,
            InvitationStatus::Cancelled,
        ] {
            assert!(status.allowed_next_states().is_empty());
        }
        assert!(InvitationStatus::Pending.can_transition_to(InvitationStatus::Accepted));
    }

    #[test]
    fn only_owner_and_admin_manage() {
        assert!(MemberRole::Owner.can_manage());
        assert!(MemberRole::Admin.can_manage());
        assert!(!MemberRole::Member.can_manage());
    }
}
