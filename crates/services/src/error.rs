//! Shared error types for the services crate.

use thiserror::Error;

use portal_core::model::ValidationError;
use storage::hosted::HostedStoreError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuestionResolver`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolveError {
    #[error("questionIds must be a non-empty array")]
    EmptyRequest,
    /// The store failed the query; carries the store's message.
    #[error("{0}")]
    StoreQueryFailed(String),
    #[error("no questions found for the requested ids")]
    NoMatchingQuestions,
}

/// Errors emitted by `PracticeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no questions match the selected chapters")]
    NoQuestionsAvailable,
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Hosted(#[from] HostedStoreError),
}
