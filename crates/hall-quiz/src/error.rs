//! Quiz generation error types.

use thiserror::Error;

/// Errors that can occur while generating test questions.
#[derive(Debug, Error)]
pub enum QuizError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The provider returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// The model's answer could not be turned into questions.
    #[error("parse error: {0}")]
    Parse(String),

    /// The request itself was rejected before calling the provider.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No API key or base URL is configured.
    #[error("quiz provider is not configured (set quiz.api_key)")]
    NotConfigured,
}
