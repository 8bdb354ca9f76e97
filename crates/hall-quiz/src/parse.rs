//! Turning a model answer into validated questions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Number of answer options every question must carry.
pub const OPTION_COUNT: usize = 4;

/// A generated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: String,
}

impl Question {
    fn validate(&self, position: usize) -> Result<(), QuizError> {
        if self.question.trim().is_empty() {
            return Err(QuizError::Parse(format!("question {position} has no text")));
        }
        if self.options.len() != OPTION_COUNT {
            return Err(QuizError::Parse(format!(
                "question {position} has {} options, expected {OPTION_COUNT}",
                self.options.len()
            )));
        }
        if self.correct_index >= OPTION_COUNT {
            return Err(QuizError::Parse(format!(
                "question {position} has correct_index {} out of range",
                self.correct_index
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    List(Vec<Question>),
    Wrapped { questions: Vec<Question> },
}

/// Strip a surrounding markdown code fence (```json ... ```), if present.
fn strip_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Parse the model's reply into questions.
///
/// Accepts a bare JSON array or an object with a `questions` array, either
/// optionally wrapped in a code fence.
///
/// # Errors
///
/// Returns [`QuizError::Parse`] when the JSON is malformed, empty, or a
/// question fails validation.
pub fn parse_questions(raw: &str) -> Result<Vec<Question>, QuizError> {
    let body = strip_fence(raw);
    let payload: Payload = serde_json::from_str(body)
        .map_err(|e| QuizError::Parse(format!("model reply is not question JSON: {e}")))?;
    let questions = match payload {
        Payload::List(list) | Payload::Wrapped { questions: list } => list,
    };
    if questions.is_empty() {
        return Err(QuizError::Parse("model returned no questions".into()));
    }
    for (i, q) in questions.iter().enumerate() {
        q.validate(i + 1)?;
    }
    Ok(questions)
}
