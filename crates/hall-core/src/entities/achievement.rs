use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::AchievementKind;

/// A badge earned by a user. Each kind is earned at most once.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Achievement {
    pub id: String,
    pub user_id: String,
    pub kind: AchievementKind,
    pub earned_at: DateTime<Utc>,
}
