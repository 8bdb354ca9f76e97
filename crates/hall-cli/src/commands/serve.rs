use hall_quiz::{QuizClient, QuizError};
use hall_server::AppState;

use crate::cli::root_commands::ServeArgs;
use crate::context::AppContext;

/// Handle `hall serve`. Consumes the context: the service moves into the server.
pub async fn handle(args: &ServeArgs, ctx: AppContext) -> anyhow::Result<()> {
    let AppContext {
        service, config, ..
    } = ctx;

    if !config.server.is_configured() {
        anyhow::bail!(
            "server.service_key is not set; set STUDYHALL_SERVER__SERVICE_KEY before serving"
        );
    }

    let quiz = match QuizClient::from_config(&config.quiz) {
        Ok(client) => Some(client),
        Err(QuizError::NotConfigured) => {
            tracing::warn!("quiz provider not configured; generate-test-questions will fail");
            None
        }
        Err(error) => return Err(error.into()),
    };

    let host = args.host.as_deref().unwrap_or(&config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let address = format!("{host}:{port}");

    let state = AppState::new(service, quiz, &config.server.service_key);
    hall_server::serve(state, &address).await?;
    Ok(())
}
