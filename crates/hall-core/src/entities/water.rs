use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct WaterIntake {
    pub id: String,
    pub user_id: String,
    pub amount_ml: i64,
    pub logged_at: DateTime<Utc>,
}
