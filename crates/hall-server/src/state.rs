use std::sync::Arc;

use hall_db::service::HallService;
use hall_quiz::QuizClient;

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<HallService>,
    /// `None` when no quiz provider is configured.
    pub quiz: Option<Arc<QuizClient>>,
    pub service_key: Arc<str>,
}

impl AppState {
    pub fn new(service: HallService, quiz: Option<QuizClient>, service_key: &str) -> Self {
        Self {
            service: Arc::new(service),
            quiz: quiz.map(Arc::new),
            service_key: Arc::from(service_key),
        }
    }
}
