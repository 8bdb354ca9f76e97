//! HTTP server configuration for the serverless functions.

use serde::{Deserialize, Serialize};

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8787
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer key callers must present. Functions refuse to serve without one.
    #[serde(default)]
    pub service_key: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            service_key: String::new(),
        }
    }
}

impl ServerConfig {
    pub fn is_configured(&self) -> bool {
        !self.service_key.is_empty()
    }

    /// `host:port` string for binding.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
