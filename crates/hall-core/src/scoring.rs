//! Points allocation and goal progress arithmetic.
//!
//! Pure functions only. The database layer reads the current goal, calls
//! [`apply_progress`], and persists the result together with a points row
//! worth [`points_for`] the applied amount.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::GoalUnit;

/// Result of adding a delta to a goal counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProgressStep {
    /// Portion of the delta that actually counted (after clamping at target).
    pub applied: i64,
    pub new_progress: i64,
    /// `true` when this step brought the goal exactly to its target.
    pub completed: bool,
}

/// Add `delta` to `progress`, clamping at `target`.
///
/// A non-positive delta, or a goal already at target, applies nothing.
#[must_use]
pub fn apply_progress(progress: i64, target: i64, delta: i64) -> ProgressStep {
    let current = progress.clamp(0, target.max(0));
    let room = target.max(0) - current;
    let applied = delta.clamp(0, room);
    let new_progress = current + applied;
    ProgressStep {
        applied,
        new_progress,
        completed: applied > 0 && new_progress == target,
    }
}

/// Points earned for `delta` units of progress.
#[must_use]
pub const fn points_for(unit: GoalUnit, delta: i64) -> i64 {
    if delta <= 0 {
        return 0;
    }
    delta.saturating_mul(unit.multiplier())
}

/// Points earned for a completed study session of `minutes`.
#[must_use]
pub const fn session_points(minutes: i64) -> i64 {
    points_for(GoalUnit::Time, minutes)
}

/// Whole minutes between two instants. Never negative.
#[must_use]
pub fn session_minutes(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> i64 {
    (ended_at - started_at).num_minutes().max(0)
}
