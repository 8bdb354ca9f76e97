//! Water tracking configuration.

use serde::{Deserialize, Serialize};

const fn default_daily_goal_ml() -> i64 {
    2000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WaterConfig {
    /// Daily intake goal in millilitres.
    #[serde(default = "default_daily_goal_ml")]
    pub daily_goal_ml: i64,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            daily_goal_ml: default_daily_goal_ml(),
        }
    }
}
