//! POST /api/practice-sessions — validate a session config and plan it.

use axum::Json;
use axum::extract::Extension;
use axum::extract::rejection::JsonRejection;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use portal_core::model::{BookCode, QuestionId, QuestionRecord};
use services::{AppServices, PracticeSession};

use crate::error::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSessionResponse {
    pub session_id: Uuid,
    pub book_code: BookCode,
    pub test_mode: &'static str,
    pub time_limit_in_minutes: Option<u32>,
    pub started_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub question_ids: Vec<QuestionId>,
    pub total_questions: usize,
    pub data: Vec<QuestionRecord>,
}

impl From<PracticeSession> for PracticeSessionResponse {
    fn from(session: PracticeSession) -> Self {
        let mode = session.config.test_mode();
        Self {
            session_id: session.id,
            book_code: session.config.book_code().clone(),
            test_mode: mode.as_str(),
            time_limit_in_minutes: mode.time_limit_minutes(),
            started_at: session.started_at,
            ends_at: session.ends_at,
            total_questions: session.selection.total_questions(),
            question_ids: session.selection.into_ids(),
            data: session.questions,
        }
    }
}

pub async fn practice_sessions(
    Extension(services): Extension<AppServices>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PracticeSessionResponse>, ApiError> {
    let Json(body) = payload?;
    let session = services.practice().start_session(&body).await?;
    Ok(Json(session.into()))
}
