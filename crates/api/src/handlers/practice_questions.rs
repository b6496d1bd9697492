//! POST /api/practice-questions — fetch full records for a list of ids.
//!
//! The client sends the ids it got from a session plan and renders the
//! returned records; nothing is cached or written.

use axum::Json;
use axum::extract::Extension;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;
use serde_json::Value;

use portal_core::model::QuestionRecord;
use portal_core::parse_question_ids;
use services::AppServices;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct PracticeQuestionsResponse {
    pub data: Vec<QuestionRecord>,
}

pub async fn practice_questions(
    Extension(services): Extension<AppServices>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PracticeQuestionsResponse>, ApiError> {
    let Json(body) = payload?;
    let ids = parse_question_ids(&body)?;

    let resolved = services.resolver().resolve(&ids).await?;
    tracing::info!(
        requested = ids.len(),
        returned = resolved.total_questions,
        "served practice questions"
    );
    Ok(Json(PracticeQuestionsResponse {
        data: resolved.questions,
    }))
}
