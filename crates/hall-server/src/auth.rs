//! Bearer service-key check for the function routes.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::{error::ServerError, state::AppState};

/// Reject requests whose `Authorization: Bearer <key>` does not match the
/// configured service key. An empty configured key rejects everything.
pub async fn require_service_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    match presented {
        Some(key) if !state.service_key.is_empty() && keys_match(key, &state.service_key) => {
            Ok(next.run(request).await)
        }
        _ => Err(ServerError::Unauthorized),
    }
}

/// Constant-time for keys of equal length.
fn keys_match(presented: &str, expected: &str) -> bool {
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::keys_match;

    #[test]
    fn compare() {
        assert!(keys_match("secret", "secret"));
        assert!(!keys_match("secreT", "secret"));
        assert!(!keys_match("secret-longer", "secret"));
        assert!(!keys_match("", "secret"));
    }
}
