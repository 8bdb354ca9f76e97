use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::NotificationKind;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: Option<String>,
    /// Entity the notification refers to (group, goal, invitation...).
    pub reference_id: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
