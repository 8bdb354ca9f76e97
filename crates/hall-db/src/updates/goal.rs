//! Goal update builder.
//!
//! Progress is not part of the update: it only moves through
//! `HallService::update_goal_progress` so points stay consistent.

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct GoalUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<Option<String>>,
}

pub struct GoalUpdateBuilder(GoalUpdate);

impl GoalUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(GoalUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub const fn target(mut self, target: i64) -> Self {
        self.0.target = Some(target);
        self
    }

    #[must_use]
    pub const fn deadline(mut self, deadline: Option<NaiveDate>) -> Self {
        self.0.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn subject_id(mut self, subject_id: Option<String>) -> Self {
        self.0.subject_id = Some(subject_id);
        self
    }

    #[must_use]
    pub fn build(self) -> GoalUpdate {
        self.0
    }
}

impl Default for GoalUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
