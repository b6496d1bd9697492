use std::sync::Arc;

use storage::hosted::HostedStoreConfig;
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::practice::{PracticeService, QuestionResolver};

/// Assembles the request-facing services over one question store.
#[derive(Clone)]
pub struct AppServices {
    resolver: Arc<QuestionResolver>,
    practice: Arc<PracticeService>,
}

impl AppServices {
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock) -> Self {
        let resolver = Arc::new(QuestionResolver::new(Arc::clone(&storage.questions)));
        let practice = Arc::new(PracticeService::new(clock, Arc::clone(&storage.questions)));
        Self { resolver, practice }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the pool cannot be opened or migrated.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(&storage, clock))
    }

    /// Build services backed by the hosted REST store.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be built.
    pub fn new_hosted(config: HostedStoreConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::hosted(config)?;
        Ok(Self::new(&storage, clock))
    }

    #[must_use]
    pub fn resolver(&self) -> Arc<QuestionResolver> {
        Arc::clone(&self.resolver)
    }

    #[must_use]
    pub fn practice(&self) -> Arc<PracticeService> {
        Arc::clone(&self.practice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::model::QuestionId;

    #[tokio::test]
    async fn services_share_one_store() {
        let storage = Storage::in_memory();
        let services = AppServices::new(&storage, Clock::default());

        let err = services
            .resolver()
            .resolve(&[QuestionId::new("nope")])
            .await
            .unwrap_err();
        assert_eq!(err, crate::ResolveError::NoMatchingQuestions);
    }
}
