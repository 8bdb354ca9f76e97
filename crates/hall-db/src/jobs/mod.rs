//! Batch functions behind the `/functions/v1/*` endpoints.
//!
//! Each job is best effort: one item failing is logged with
//! `tracing::warn!`, reported in the response's `failed` list, and the batch
//! moves on.

pub mod auto_update_goals;
pub mod leaderboard_changes;
pub mod water_reminder;

use hall_core::responses::FailedItem;

use crate::error::DatabaseError;

pub(crate) fn failed(id: &str, error: &DatabaseError) -> FailedItem {
    FailedItem {
        id: id.to_string(),
        error: error.to_string(),
    }
}
