//! Error type for function handlers and its HTTP mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hall_db::error::DatabaseError;
use hall_quiz::QuizError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("missing or invalid service key")]
    Unauthorized,

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MalformedPayload(_)
            | Self::Database(DatabaseError::Validation(_) | DatabaseError::InvalidState(_))
            | Self::Quiz(QuizError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            Self::Database(DatabaseError::NoResult) => StatusCode::NOT_FOUND,
            Self::Database(DatabaseError::Forbidden(_)) => StatusCode::FORBIDDEN,
            Self::Database(_) | Self::Quiz(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "function failed");
        } else {
            tracing::debug!(%status, error = %self, "function rejected request");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ServerError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ServerError::MalformedPayload("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::from(DatabaseError::NoResult).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::from(DatabaseError::InvalidState("active".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::from(DatabaseError::Forbidden("not a member".into())).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServerError::from(QuizError::NotConfigured).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServerError::from(QuizError::InvalidRequest("count".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
