//! Database location and optional remote replica settings.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    String::from(".studyhall/studyhall.db")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Local database file. With a remote URL this is the embedded replica.
    #[serde(default = "default_path")]
    pub path: String,

    /// Remote libSQL URL (e.g., `libsql://studyhall.turso.io`). Empty = local only.
    #[serde(default)]
    pub url: String,

    /// Auth token for the remote database.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            url: String::new(),
            auth_token: String::new(),
        }
    }
}

impl DatabaseConfig {
    /// Whether a remote replica should be opened instead of a plain local file.
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_local() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, ".studyhall/studyhall.db");
        assert!(!config.is_remote());
    }

    #[test]
    fn remote_needs_url_and_token() {
        let mut config = DatabaseConfig {
            url: "libsql://studyhall.turso.io".into(),
            ..Default::default()
        };
        assert!(!config.is_remote());
        config.auth_token = "token".into();
        assert!(config.is_remote());
    }
}
