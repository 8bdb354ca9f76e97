//! Function handlers. Each takes a JSON body and returns JSON.

use axum::{Json, body::Bytes, extract::State};
use chrono::{NaiveDate, Utc};
use hall_core::responses::{
    AutoUpdateGoalsResponse, LeaderboardChangesResponse, WaterReminderResponse,
};
use hall_quiz::{QuizError, QuizRequest, QuizResponse};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{error::ServerError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct AutoUpdateGoalsPayload {
    pub session_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardChangesPayload {
    #[serde(default)]
    pub group_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WaterReminderPayload {
    /// Defaults to today (UTC).
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

/// Decode a JSON body. An empty body decodes as `{}`.
fn parse_payload<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, ServerError> {
    let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        bytes.as_ref()
    };
    serde_json::from_slice(raw).map_err(|e| ServerError::MalformedPayload(e.to_string()))
}

pub async fn health_handler() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn auto_update_goals_handler(
    State(state): State<AppState>,
    bytes: Bytes,
) -> Result<Json<AutoUpdateGoalsResponse>, ServerError> {
    let payload: AutoUpdateGoalsPayload = parse_payload(&bytes)?;
    if payload.session_id.trim().is_empty() {
        return Err(ServerError::MalformedPayload("session_id is empty".into()));
    }
    let response = state.service.auto_update_goals(&payload.session_id).await?;
    tracing::info!(
        session_id = %payload.session_id,
        updated = response.updated.len(),
        failed = response.failed.len(),
        "auto-update-goals"
    );
    Ok(Json(response))
}

pub async fn check_leaderboard_changes_handler(
    State(state): State<AppState>,
    bytes: Bytes,
) -> Result<Json<LeaderboardChangesResponse>, ServerError> {
    let payload: LeaderboardChangesPayload = parse_payload(&bytes)?;
    let response = state
        .service
        .check_leaderboard_changes(payload.group_id.as_deref())
        .await?;
    tracing::info!(
        groups = response.groups.len(),
        failed = response.failed.len(),
        "check-leaderboard-changes"
    );
    Ok(Json(response))
}

pub async fn water_reminder_handler(
    State(state): State<AppState>,
    bytes: Bytes,
) -> Result<Json<WaterReminderResponse>, ServerError> {
    let payload: WaterReminderPayload = parse_payload(&bytes)?;
    let date = payload.date.unwrap_or_else(|| Utc::now().date_naive());
    let response = state.service.water_reminders(date).await?;
    tracing::info!(
        %date,
        reminded = response.reminded.len(),
        failed = response.failed.len(),
        "water-reminder"
    );
    Ok(Json(response))
}

pub async fn generate_test_questions_handler(
    State(state): State<AppState>,
    bytes: Bytes,
) -> Result<Json<QuizResponse>, ServerError> {
    let request: QuizRequest = parse_payload(&bytes)?;
    let quiz = state.quiz.as_ref().ok_or(QuizError::NotConfigured)?;
    let response = quiz.generate(&request).await?;
    tracing::info!(
        subject = %response.subject,
        questions = response.questions.len(),
        "generate-test-questions"
    );
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_empty_object() {
        let payload: LeaderboardChangesPayload = parse_payload(&Bytes::new()).unwrap();
        assert!(payload.group_id.is_none());
        let payload: WaterReminderPayload = parse_payload(&Bytes::from_static(b" \n")).unwrap();
        assert!(payload.date.is_none());
    }

    #[test]
    fn required_fields_still_required() {
        let err = parse_payload::<AutoUpdateGoalsPayload>(&Bytes::new()).unwrap_err();
        assert!(matches!(err, ServerError::MalformedPayload(_)));
    }

    #[test]
    fn date_parses() {
        let payload: WaterReminderPayload =
            parse_payload(&Bytes::from_static(br#"{"date":"2026-03-14"}"#)).unwrap();
        assert_eq!(payload.date, NaiveDate::from_ymd_opt(2026, 3, 14));
    }
}
