//! # hall-server
//!
//! HTTP surface for the Studyhall serverless functions.
//!
//! | route                                        | body                         |
//! |----------------------------------------------|------------------------------|
//! | `POST /functions/v1/auto-update-goals`       | `{"session_id": "ses-…"}`    |
//! | `POST /functions/v1/check-leaderboard-changes` | `{"group_id": "grp-…"}` or `{}` |
//! | `POST /functions/v1/water-reminder`          | `{"date": "YYYY-MM-DD"}` or `{}` |
//! | `POST /functions/v1/generate-test-questions` | `QuizRequest`                |
//! | `GET /health`                                | none, unauthenticated        |
//!
//! Function routes require `Authorization: Bearer <service key>`. Behind an
//! embedded replica each function call pulls remote state first.

use std::time::Duration;

use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub mod auth;
pub mod error;
pub mod replica;
pub mod routes;
pub mod state;

pub use error::ServerError;
pub use state::AppState;

use routes::{
    auto_update_goals_handler, check_leaderboard_changes_handler,
    generate_test_questions_handler, health_handler, water_reminder_handler,
};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    let functions = Router::new()
        .route("/auto-update-goals", post(auto_update_goals_handler))
        .route(
            "/check-leaderboard-changes",
            post(check_leaderboard_changes_handler),
        )
        .route("/water-reminder", post(water_reminder_handler))
        .route(
            "/generate-test-questions",
            post(generate_test_questions_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            replica::refresh_replica,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_service_key,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/functions/v1", functions)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind `address` and serve until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns [`ServerError::Io`] if binding or serving fails.
pub async fn serve(state: AppState, address: &str) -> Result<(), ServerError> {
    let app = router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(address).await?;
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::warn!(%e, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!(%e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
