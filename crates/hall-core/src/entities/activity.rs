use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A photo post shared with a group.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Activity {
    pub id: String,
    pub group_id: String,
    pub user_id: String,
    pub caption: Option<String>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}
