//! Daily water intake progress.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Largest single intake `log_water` accepts.
pub const MAX_INTAKE_ML: i64 = 5_000;

/// Progress toward the daily water goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WaterProgress {
    pub total_ml: i64,
    pub goal_ml: i64,
    pub remaining_ml: i64,
    /// Capped at 100.
    pub percent: u8,
}

impl WaterProgress {
    #[must_use]
    pub const fn goal_met(&self) -> bool {
        self.total_ml >= self.goal_ml
    }
}

#[must_use]
pub fn water_progress(total_ml: i64, goal_ml: i64) -> WaterProgress {
    let total_ml = total_ml.max(0);
    let remaining_ml = goal_ml.saturating_sub(total_ml).max(0);
    let percent = if goal_ml <= 0 {
        100
    } else {
        let pct = (i128::from(total_ml) * 100 / i128::from(goal_ml)).min(100);
        u8::try_from(pct).unwrap_or(100)
    };
    WaterProgress {
        total_ml,
        goal_ml,
        remaining_ml,
        percent,
    }
}
