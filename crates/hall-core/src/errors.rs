//! Cross-cutting error types for Studyhall.
//!
//! Domain-specific errors (e.g., `DatabaseError`, `QuizError`) are defined in
//! their respective crates. The CLI converges everything into `anyhow`.

use std::fmt::Display;

use thiserror::Error;

/// Errors that can be raised by any Studyhall crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// Data failed validation (range, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    pub fn invalid_transition(
        entity_type: &str,
        id: &str,
        from: impl Display,
        to: impl Display,
    ) -> Self {
        Self::InvalidTransition {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
