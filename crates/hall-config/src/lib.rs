//! # hall-config
//!
//! Layered configuration loading for Studyhall using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`STUDYHALL_*` prefix, `__` as separator)
//! 2. Project-level `.studyhall/config.toml`
//! 3. User-level `~/.config/studyhall/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `STUDYHALL_SERVER__PORT` -> `server.port`,
//! `STUDYHALL_WATER__DAILY_GOAL_ML` -> `water.daily_goal_ml`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use hall_config::HallConfig;
//!
//! let config = HallConfig::load_with_dotenv().expect("config");
//! println!("database at {}", config.database.path);
//! ```

mod database;
mod error;
mod general;
mod quiz;
mod server;
mod water;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use quiz::QuizConfig;
pub use server::ServerConfig;
pub use water::WaterConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for all settings.
pub const ENV_PREFIX: &str = "STUDYHALL_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HallConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub water: WaterConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub quiz: QuizConfig,
}

impl HallConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` on the current directory's `.env` before building the
    /// figment. This is the typical entry point for the CLI.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".studyhall/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment
    }

    /// Reject values figment accepts but the application cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.water.daily_goal_ml <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "water.daily_goal_ml".into(),
                reason: format!("must be positive, got {}", self.water.daily_goal_ml),
            });
        }
        if self.general.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.default_limit".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("studyhall").join("config.toml"))
    }
}
