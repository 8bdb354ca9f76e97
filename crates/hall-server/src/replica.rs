//! Keep an embedded replica current for the function routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{error::ServerError, state::AppState};

/// Pull remote state before the handler runs so a long-lived server never
/// answers from the snapshot taken at startup. A no-op on local databases.
pub async fn refresh_replica(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    state.service.sync().await?;
    Ok(next.run(request).await)
}
