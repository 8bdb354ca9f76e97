use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::PointsReason;

/// One row of the points ledger. Totals are always derived by summing rows.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PointsEntry {
    pub id: String,
    pub user_id: String,
    pub group_id: Option<String>,
    pub amount: i64,
    pub reason: PointsReason,
    /// ID of the session or goal that produced the points.
    pub source_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
