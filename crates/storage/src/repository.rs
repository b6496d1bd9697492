use async_trait::async_trait;
use portal_core::model::{
    BookCode, CatalogEntry, ChapterId, QuestionId, QuestionRecord, sort_by_book_order,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    /// The store rejected or failed the query; carries the store's message.
    #[error("{0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read access to the question store.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Fetch every record whose id is in `ids` with a single query.
    ///
    /// Records come back ascending by `question_number_in_book` (ties by id),
    /// at most once per id. Unknown ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn find_by_ids(&self, ids: &[QuestionId]) -> Result<Vec<QuestionRecord>, StorageError>;

    /// List the questions of one chapter in book order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn chapter_catalog(
        &self,
        book: &BookCode,
        chapter: &ChapterId,
    ) -> Result<Vec<CatalogEntry>, StorageError>;

    /// Insert or replace a question. Used for seeding and tests.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn upsert_question(&self, record: &QuestionRecord) -> Result<(), StorageError>;
}

/// Unique ids in first-seen order.
#[must_use]
pub fn distinct_ids(ids: &[QuestionId]) -> Vec<&QuestionId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().filter(|id| seen.insert(*id)).collect()
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<HashMap<QuestionId, QuestionRecord>>>,
    queries: Arc<AtomicUsize>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of read queries served so far.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn find_by_ids(&self, ids: &[QuestionId]) -> Result<Vec<QuestionRecord>, StorageError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut found: Vec<QuestionRecord> = distinct_ids(ids)
            .into_iter()
            .filter_map(|id| guard.get(id).cloned())
            .collect();
        sort_by_book_order(&mut found);
        Ok(found)
    }

    async fn chapter_catalog(
        &self,
        book: &BookCode,
        chapter: &ChapterId,
    ) -> Result<Vec<CatalogEntry>, StorageError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows: Vec<QuestionRecord> = guard
            .values()
            .filter(|q| &q.book_code == book && &q.chapter == chapter)
            .cloned()
            .collect();
        sort_by_book_order(&mut rows);
        Ok(rows.iter().map(CatalogEntry::from).collect())
    }

    async fn upsert_question(&self, record: &QuestionRecord) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(record.id.clone(), record.clone());
        Ok(())
    }
}

/// Holds the process-wide store handle behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    #[must_use]
    pub fn from_repository(repo: impl QuestionRepository + 'static) -> Self {
        Self {
            questions: Arc::new(repo),
        }
    }
}
