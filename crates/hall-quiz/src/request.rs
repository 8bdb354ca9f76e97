//! Quiz request validation and prompt construction.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Largest number of questions a single request may ask for.
pub const MAX_QUESTIONS: u8 = 20;

/// How hard the generated questions should be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(QuizError::InvalidRequest(format!(
                "unknown difficulty '{other}' (expected easy, medium or hard)"
            ))),
        }
    }
}

/// Parameters for one batch of generated questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuizRequest {
    pub subject: String,
    pub topic: String,
    #[serde(default = "default_count")]
    pub count: u8,
    #[serde(default)]
    pub difficulty: Difficulty,
}

const fn default_count() -> u8 {
    5
}

impl QuizRequest {
    /// Reject blank subject/topic and counts outside `1..=20`.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::InvalidRequest`] describing the first problem found.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.subject.trim().is_empty() {
            return Err(QuizError::InvalidRequest("subject must not be empty".into()));
        }
        if self.topic.trim().is_empty() {
            return Err(QuizError::InvalidRequest("topic must not be empty".into()));
        }
        if !(1..=MAX_QUESTIONS).contains(&self.count) {
            return Err(QuizError::InvalidRequest(format!(
                "count must be between 1 and {MAX_QUESTIONS}, got {}",
                self.count
            )));
        }
        Ok(())
    }

    pub(crate) fn system_prompt() -> &'static str {
        "You write multiple-choice test questions for students. \
         Answer with JSON only: an array of objects with the keys \
         \"question\" (string), \"options\" (array of exactly 4 strings), \
         \"correct_index\" (integer 0-3) and \"explanation\" (string). \
         Do not add any text outside the JSON."
    }

    pub(crate) fn user_prompt(&self) -> String {
        format!(
            "Write {count} {difficulty} multiple-choice questions about \"{topic}\" \
             for the subject \"{subject}\". Each question has exactly 4 options \
             and one correct answer.",
            count = self.count,
            difficulty = self.difficulty,
            topic = self.topic.trim(),
            subject = self.subject.trim(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn request(count: u8) -> QuizRequest {
        QuizRequest {
            subject: "Biology".into(),
            topic: "Cell division".into(),
            count,
            difficulty: Difficulty::Hard,
        }
    }

    #[rstest]
    #[case(1, true)]
    #[case(20, true)]
    #[case(0, false)]
    #[case(21, false)]
    fn count_bounds(#[case] count: u8, #[case] ok: bool) {
        assert_eq!(request(count).validate().is_ok(), ok);
    }

    #[test]
    fn blank_topic_rejected() {
        let mut req = request(3);
        req.topic = "  ".into();
        assert!(matches!(req.validate(), Err(QuizError::InvalidRequest(_))));
    }

    #[test]
    fn prompt_mentions_parameters() {
        let prompt = request(7).user_prompt();
        assert!(prompt.contains("7 hard"));
        assert!(prompt.contains("Cell division"));
        assert!(prompt.contains("Biology"));
    }

    #[test]
    fn defaults_from_json() {
        let req: QuizRequest =
            serde_json::from_str(r#"{"subject":"Math","topic":"Limits"}"#).unwrap();
        assert_eq!(req.count, 5);
        assert_eq!(req.difficulty, Difficulty::Medium);
    }

    #[rstest]
    #[case("easy", Difficulty::Easy)]
    #[case("MEDIUM", Difficulty::Medium)]
    #[case(" hard ", Difficulty::Hard)]
    fn difficulty_parses(#[case] raw: &str, #[case] expected: Difficulty) {
        assert_eq!(raw.parse::<Difficulty>().unwrap(), expected);
    }

    #[test]
    fn unknown_difficulty() {
        assert!("brutal".parse::<Difficulty>().is_err());
    }
}
