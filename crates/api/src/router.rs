//! Router construction for the practice question API.

use axum::{
    Extension, Router,
    routing::{get, post},
};
use services::AppServices;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Build the full axum router with all routes and middleware.
pub fn build_router(services: AppServices) -> Router {
    let api = Router::new()
        .route(
            "/practice-questions",
            post(handlers::practice_questions::practice_questions),
        )
        .route(
            "/practice-sessions",
            post(handlers::practice_sessions::practice_sessions),
        );

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api", api)
        .layer(Extension(services))
        .layer(TraceLayer::new_for_http())
}
