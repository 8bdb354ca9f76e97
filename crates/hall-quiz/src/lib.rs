//! # hall-quiz
//!
//! Generates multiple-choice test questions through an OpenAI-compatible
//! chat completions endpoint.
//!
//! The client sends one system prompt describing the JSON shape and one user
//! prompt built from a [`QuizRequest`], then parses the first choice's content
//! with [`parse_questions`].

mod error;
mod http;
mod parse;
mod request;

pub use error::QuizError;
pub use parse::{OPTION_COUNT, Question, parse_questions};
pub use request::{Difficulty, MAX_QUESTIONS, QuizRequest};

use std::time::Duration;

use hall_config::QuizConfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::http::check_response;

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_content(self) -> Result<String, QuizError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| QuizError::Parse("completion has no message content".into()))
    }
}

/// Generated questions together with the request that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuizResponse {
    pub subject: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub questions: Vec<Question>,
}

// ── Client ─────────────────────────────────────────────────────────

/// HTTP client for the question generation provider.
#[derive(Debug, Clone)]
pub struct QuizClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl QuizClient {
    /// Create a client for `base_url` (without the `/chat/completions` suffix).
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::Http`] if the underlying `reqwest::Client` cannot
    /// be built.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, QuizError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("studyhall/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Create a client from the `[quiz]` config section.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::NotConfigured`] when no API key is set.
    pub fn from_config(config: &QuizConfig) -> Result<Self, QuizError> {
        if !config.is_configured() {
            return Err(QuizError::NotConfigured);
        }
        Self::new(
            &config.base_url,
            config.api_key.clone(),
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Generate questions for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::InvalidRequest`] before any network call when the
    /// request is invalid, otherwise transport, status, or parse errors.
    pub async fn generate(&self, request: &QuizRequest) -> Result<QuizResponse, QuizError> {
        request.validate()?;

        let user_prompt = request.user_prompt();
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: QuizRequest::system_prompt(),
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: 0.7,
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            count = request.count,
            "requesting quiz questions"
        );
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        let content = resp.json::<ChatResponse>().await?.into_content()?;

        let mut questions = parse_questions(&content)?;
        if questions.len() > usize::from(request.count) {
            tracing::debug!(
                returned = questions.len(),
                requested = request.count,
                "truncating extra questions"
            );
            questions.truncate(usize::from(request.count));
        }

        Ok(QuizResponse {
            subject: request.subject.trim().to_string(),
            topic: request.topic.trim().to_string(),
            difficulty: request.difficulty,
            questions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client() -> QuizClient {
        QuizClient::new(
            "http://127.0.0.1:9/v1/",
            "sk-test",
            "test-model",
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(client().endpoint(), "http://127.0.0.1:9/v1/chat/completions");
    }

    #[test]
    fn unconfigured_config_is_rejected() {
        let err = QuizClient::from_config(&QuizConfig::default()).unwrap_err();
        assert!(matches!(err, QuizError::NotConfigured));
    }

    #[test]
    fn configured_config_builds() {
        let config = QuizConfig {
            api_key: "sk-live".into(),
            ..QuizConfig::default()
        };
        let client = QuizClient::from_config(&config).unwrap();
        assert!(client.endpoint().ends_with("/chat/completions"));
    }

    #[tokio::test]
    async fn invalid_request_fails_before_network() {
        let request = QuizRequest {
            subject: "History".into(),
            topic: "Rome".into(),
            count: 0,
            difficulty: Difficulty::Easy,
        };
        let err = client().generate(&request).await.unwrap_err();
        assert!(matches!(err, QuizError::InvalidRequest(_)));
    }

    #[test]
    fn completion_content_extracted() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"[]"}}]}"#,
        )
        .unwrap();
        assert_eq!(resp.into_content().unwrap(), "[]");
    }

    #[test]
    fn empty_completion_is_parse_error() {
        let resp: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(resp.into_content(), Err(QuizError::Parse(_))));

        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(matches!(resp.into_content(), Err(QuizError::Parse(_))));
    }

    #[test]
    fn chat_request_shape() {
        let body = ChatRequest {
            model: "m",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "s",
                },
                ChatMessage {
                    role: "user",
                    content: "u",
                },
            ],
            temperature: 0.5,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["model"], "m");
    }
}
