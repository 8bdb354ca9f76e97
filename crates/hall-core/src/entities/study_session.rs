use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SessionStatus;

/// A timed study interval attributed to a user and optional subject.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StudySession {
    pub id: String,
    pub user_id: String,
    pub group_id: Option<String>,
    pub subject_id: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Whole minutes, set when the session completes.
    pub duration_minutes: i64,
    pub status: SessionStatus,
    pub notes: Option<String>,
}
