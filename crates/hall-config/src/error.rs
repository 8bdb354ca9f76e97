//! Errors raised while loading configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider failed to read or a value failed to deserialize.
    #[error("failed to load studyhall config: {0}")]
    Figment(#[from] figment::Error),

    /// A value parsed but is outside what the app accepts.
    #[error("bad value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
