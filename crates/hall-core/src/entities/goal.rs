use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{GoalStatus, GoalUnit};

/// A target count of exercises, pages or minutes tracked per subject per group.
///
/// `progress` never exceeds `target`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Goal {
    pub id: String,
    pub group_id: String,
    pub subject_id: Option<String>,
    pub title: String,
    pub unit: GoalUnit,
    pub target: i64,
    pub progress: i64,
    pub status: GoalStatus,
    pub deadline: Option<NaiveDate>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Completion percentage, 0..=100.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.target <= 0 {
            return 0;
        }
        let pct = (self.progress.clamp(0, self.target) * 100) / self.target;
        u8::try_from(pct).unwrap_or(100)
    }
}
