use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use portal_core::RequestError;
use portal_core::model::ValidationError;
use services::{PracticeError, ResolveError};

/// Every failure an HTTP handler can surface.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("malformed JSON body: {0}")]
    MalformedBody(String),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Practice(#[from] PracticeError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

const INTERNAL_MESSAGE: &str = "internal server error";

fn body(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(json!({ "error": error.into() }))).into_response()
}

fn validation_body(e: &ValidationError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": e.to_string(), "kind": e.kind() })),
    )
        .into_response()
}

fn resolve_response(e: ResolveError) -> Response {
    match e {
        ResolveError::EmptyRequest => body(StatusCode::BAD_REQUEST, e.to_string()),
        ResolveError::NoMatchingQuestions => body(StatusCode::NOT_FOUND, e.to_string()),
        ResolveError::StoreQueryFailed(message) => body(StatusCode::INTERNAL_SERVER_ERROR, message),
        other => {
            tracing::error!(error = %other, "unexpected resolve error");
            body(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MalformedBody(detail) => {
                tracing::warn!(%detail, "rejected request body");
                body(StatusCode::BAD_REQUEST, format!("malformed JSON body: {detail}"))
            }
            ApiError::Request(e) => {
                tracing::warn!(error = %e, "rejected question request");
                body(StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Resolve(e) => resolve_response(e),
            ApiError::Practice(PracticeError::Validation(e)) => validation_body(&e),
            ApiError::Practice(PracticeError::NoQuestionsAvailable) => {
                body(StatusCode::NOT_FOUND, PracticeError::NoQuestionsAvailable.to_string())
            }
            ApiError::Practice(PracticeError::Resolve(e)) => resolve_response(e),
            ApiError::Practice(PracticeError::Storage(e)) => {
                tracing::error!(error = %e, "catalog query failed");
                body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::Practice(other) => {
                tracing::error!(error = %other, "unexpected practice error");
                body(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::model::ChapterId;

    #[test]
    fn statuses_follow_error_class() {
        let cases = [
            (ApiError::from(RequestError::EmptyQuestionIds), StatusCode::BAD_REQUEST),
            (ApiError::from(ResolveError::EmptyRequest), StatusCode::BAD_REQUEST),
            (ApiError::from(ResolveError::NoMatchingQuestions), StatusCode::NOT_FOUND),
            (
                ApiError::from(ResolveError::StoreQueryFailed("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::from(PracticeError::Validation(ValidationError::InvalidRange {
                    chapter: ChapterId::new("2"),
                })),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(PracticeError::NoQuestionsAvailable),
                StatusCode::NOT_FOUND,
            ),
            (ApiError::MalformedBody("eof".into()), StatusCode::BAD_REQUEST),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
