use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A subject studied inside a group (e.g. "Linear Algebra").
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Subject {
    pub id: String,
    pub group_id: String,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}
