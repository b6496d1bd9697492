use std::sync::Arc;

use portal_core::model::{QuestionId, QuestionRecord};
use storage::repository::QuestionRepository;

use crate::error::ResolveError;

/// Records fetched for a request, in ascending book order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedQuestions {
    pub questions: Vec<QuestionRecord>,
    pub total_questions: usize,
}

/// Fetches question records for a list of ids with one store query.
#[derive(Clone)]
pub struct QuestionResolver {
    questions: Arc<dyn QuestionRepository>,
}

impl QuestionResolver {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionRepository>) -> Self {
        Self { questions }
    }

    /// Resolve ids into records, ascending by `question_number_in_book`.
    ///
    /// Duplicate ids yield one record; unknown ids are skipped. Failures are
    /// not retried.
    ///
    /// # Errors
    ///
    /// - `EmptyRequest` if `ids` is empty; the store is not queried.
    /// - `StoreQueryFailed` with the store's message if the query fails.
    /// - `NoMatchingQuestions` if none of the ids exist.
    pub async fn resolve(&self, ids: &[QuestionId]) -> Result<ResolvedQuestions, ResolveError> {
        if ids.is_empty() {
            return Err(ResolveError::EmptyRequest);
        }

        let questions = self.questions.find_by_ids(ids).await.map_err(|e| {
            tracing::error!(error = %e, requested = ids.len(), "question store query failed");
            ResolveError::StoreQueryFailed(e.to_string())
        })?;

        if questions.is_empty() {
            tracing::debug!(requested = ids.len(), "no matching questions");
            return Err(ResolveError::NoMatchingQuestions);
        }

        let total_questions = questions.len();
        tracing::debug!(requested = ids.len(), total_questions, "resolved questions");
        Ok(ResolvedQuestions {
            questions,
            total_questions,
        })
    }
}
