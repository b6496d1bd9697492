use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use uuid::Uuid;

use portal_core::model::{PracticeSessionConfig, QuestionRecord, QuestionSelection};
use portal_core::time::{Clock, deadline};
use portal_core::validate_session_config;
use storage::repository::QuestionRepository;

use super::plan::{ChapterCatalog, SelectionPlanner};
use super::resolver::QuestionResolver;
use crate::error::PracticeError;

/// A started practice session: the plan and the records to serve, in plan order.
#[derive(Debug, Clone, PartialEq)]
pub struct PracticeSession {
    pub id: Uuid,
    pub config: PracticeSessionConfig,
    pub selection: QuestionSelection,
    pub questions: Vec<QuestionRecord>,
    pub started_at: DateTime<Utc>,
    /// Set for timed tests only.
    pub ends_at: Option<DateTime<Utc>>,
}

/// Validates a session config, plans its questions and fetches them.
#[derive(Clone)]
pub struct PracticeService {
    clock: Clock,
    questions: Arc<dyn QuestionRepository>,
    resolver: QuestionResolver,
    seed: Option<u64>,
}

impl PracticeService {
    #[must_use]
    pub fn new(clock: Clock, questions: Arc<dyn QuestionRepository>) -> Self {
        let resolver = QuestionResolver::new(Arc::clone(&questions));
        Self {
            clock,
            questions,
            resolver,
            seed: None,
        }
    }

    /// Use a fixed RNG seed so plans are reproducible (tests, demos).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Start a session from an untyped request body.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Validation` for a bad config, otherwise see
    /// [`PracticeService::start_validated`].
    pub async fn start_session(&self, body: &Value) -> Result<PracticeSession, PracticeError> {
        let config = validate_session_config(body).inspect_err(|e| {
            tracing::warn!(kind = e.kind(), error = %e, "rejected practice session config");
        })?;
        self.start_validated(config).await
    }

    /// Start a session from an already validated config.
    ///
    /// # Errors
    ///
    /// - `PracticeError::Storage` if the catalog cannot be read.
    /// - `PracticeError::NoQuestionsAvailable` if the plan is empty.
    /// - `PracticeError::Resolve` if fetching the planned records fails.
    pub async fn start_validated(
        &self,
        config: PracticeSessionConfig,
    ) -> Result<PracticeSession, PracticeError> {
        let catalog = self.load_catalog(&config).await?;

        let selection = self.plan(&config, &catalog);
        if selection.is_empty() {
            return Err(PracticeError::NoQuestionsAvailable);
        }

        let resolved = self.resolver.resolve(selection.question_ids()).await?;
        let questions = in_selection_order(&selection, resolved.questions);

        let started_at = self.clock.now();
        let ends_at = config
            .test_mode()
            .time_limit_minutes()
            .map(|minutes| deadline(started_at, minutes));

        let session = PracticeSession {
            id: Uuid::new_v4(),
            config,
            selection,
            questions,
            started_at,
            ends_at,
        };
        tracing::info!(
            session_id = %session.id,
            book = %session.config.book_code(),
            order = %session.config.question_order(),
            mode = session.config.test_mode().as_str(),
            total_questions = session.selection.total_questions(),
            "started practice session"
        );
        Ok(session)
    }

    // Kept sync: `ThreadRng` is not `Send`.
    fn plan(&self, config: &PracticeSessionConfig, catalog: &ChapterCatalog) -> QuestionSelection {
        let planner = SelectionPlanner::new(config);
        match self.seed {
            Some(seed) => planner.plan(catalog, &mut StdRng::seed_from_u64(seed)),
            None => planner.plan(catalog, &mut rand::rng()),
        }
    }

    async fn load_catalog(
        &self,
        config: &PracticeSessionConfig,
    ) -> Result<ChapterCatalog, PracticeError> {
        let mut catalog = ChapterCatalog::new();
        for chapter in config.chapters().keys() {
            let entries = self
                .questions
                .chapter_catalog(config.book_code(), chapter)
                .await?;
            catalog.insert(chapter.clone(), entries);
        }
        Ok(catalog)
    }
}

/// Reorder resolved records to follow the plan; ids the store no longer has are dropped.
fn in_selection_order(
    selection: &QuestionSelection,
    records: Vec<QuestionRecord>,
) -> Vec<QuestionRecord> {
    let mut by_id: HashMap<_, _> = records.into_iter().map(|r| (r.id.clone(), r)).collect();
    selection
        .question_ids()
        .iter()
        .filter_map(|id| by_id.remove(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::model::{BookCode, ChapterId, QuestionId};
    use portal_core::time::fixed_now;
    use serde_json::json;
    use storage::repository::InMemoryRepository;

    fn question(chapter: &str, position: u32, number: u32) -> QuestionRecord {
        QuestionRecord {
            id: QuestionId::new(format!("c{chapter}-{position}")),
            book_code: BookCode::new("math-9"),
            chapter: ChapterId::new(chapter),
            question_number_in_book: number,
            prompt: "?".into(),
            options: Value::Null,
            answer: None,
            explanation: None,
            created_at: fixed_now(),
        }
    }

    async fn seeded_repo() -> InMemoryRepository {
        let repo = InMemoryRepository::new();
        for position in 1..=5 {
            repo.upsert_question(&question("1", position, position))
                .await
                .unwrap();
            repo.upsert_question(&question("2", position, 10 + position))
                .await
                .unwrap();
        }
        repo
    }

    fn service(repo: InMemoryRepository) -> PracticeService {
        PracticeService::new(Clock::fixed(fixed_now()), Arc::new(repo)).with_seed(11)
    }

    #[tokio::test]
    async fn interleaved_session_serves_records_in_plan_order() {
        let svc = service(seeded_repo().await);
        let body = json!({
            "bookCode": "math-9",
            "chapters": {
                "1": { "selected": true, "mode": "range", "values": { "start": 1, "end": 2 } },
                "2": { "selected": true, "mode": "range", "values": { "start": 4, "end": 5 } },
            },
            "questionOrder": "interleaved",
            "testMode": "practice",
        });

        let session = svc.start_session(&body).await.unwrap();

        let got: Vec<_> = session.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(got, vec!["c1-1", "c2-4", "c1-2", "c2-5"]);
        assert_eq!(session.selection.total_questions(), 4);
        assert_eq!(session.ends_at, None);
    }

    #[tokio::test]
    async fn timed_session_sets_deadline() {
        let svc = service(seeded_repo().await);
        let body = json!({
            "bookCode": "math-9",
            "chapters": { "2": { "selected": true, "mode": "quantity", "values": { "count": 3 } } },
            "questionOrder": "shuffle",
            "testMode": "timed",
            "timeLimitInMinutes": 20,
        });

        let session = svc.start_session(&body).await.unwrap();

        assert_eq!(session.questions.len(), 3);
        assert_eq!(session.started_at, fixed_now());
        assert_eq!(session.ends_at, Some(deadline(fixed_now(), 20)));
    }

    #[tokio::test]
    async fn invalid_config_never_reaches_store() {
        let repo = seeded_repo().await;
        let svc = service(repo.clone());
        let body = json!({
            "bookCode": "math-9",
            "chapters": { "1": { "selected": true, "mode": "quantity", "values": { "count": 0 } } },
        });

        let err = svc.start_session(&body).await.unwrap_err();

        assert!(matches!(err, PracticeError::Validation(_)));
        assert_eq!(repo.query_count(), 0);
    }

    #[tokio::test]
    async fn empty_book_is_no_questions_available() {
        let svc = service(InMemoryRepository::new());
        let body = json!({
            "bookCode": "unknown",
            "chapters": { "1": { "selected": true, "mode": "quantity", "values": { "count": 3 } } },
        });

        let err = svc.start_session(&body).await.unwrap_err();
        assert!(matches!(err, PracticeError::NoQuestionsAvailable));
    }
}
