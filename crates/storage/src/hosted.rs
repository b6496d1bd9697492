//! Question store reached over a hosted PostgREST-style REST API.

use std::env;

use async_trait::async_trait;
use portal_core::model::{BookCode, CatalogEntry, ChapterId, QuestionId, QuestionRecord};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use thiserror::Error;

use crate::repository::{QuestionRepository, Storage, StorageError, distinct_ids};

const QUESTIONS_TABLE: &str = "questions";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HostedStoreError {
    #[error("PORTAL_STORE_URL is not set")]
    MissingUrl,
    #[error("PORTAL_STORE_SERVICE_KEY is not set")]
    MissingServiceKey,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Clone, Debug)]
pub struct HostedStoreConfig {
    pub base_url: String,
    pub service_key: String,
}

impl HostedStoreConfig {
    /// Read the store location and service credential from the environment.
    ///
    /// # Errors
    ///
    /// Returns `HostedStoreError` if either variable is missing or blank.
    pub fn from_env() -> Result<Self, HostedStoreError> {
        let base_url = env::var("PORTAL_STORE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(HostedStoreError::MissingUrl)?;
        let service_key = env::var("PORTAL_STORE_SERVICE_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(HostedStoreError::MissingServiceKey)?;
        Ok(Self {
            base_url,
            service_key,
        })
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{QUESTIONS_TABLE}",
            self.base_url.trim_end_matches('/')
        )
    }
}

/// Client for the hosted question table.
///
/// Built once and shared; `reqwest::Client` pools connections internally.
#[derive(Clone)]
pub struct HostedQuestionStore {
    client: Client,
    config: HostedStoreConfig,
}

impl HostedQuestionStore {
    /// # Errors
    ///
    /// Returns `HostedStoreError::Http` if the HTTP client cannot be built.
    pub fn new(config: HostedStoreConfig) -> Result<Self, HostedStoreError> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.service_key)
            .bearer_auth(&self.config.service_key)
    }

    async fn fetch<T: for<'de> Deserialize<'de>>(
        &self,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, StorageError> {
        let response = self
            .authorized(self.client.get(self.config.table_url()))
            .query(query)
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let response = error_for_store(response).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

/// Surface the store's own error message when the request failed.
async fn error_for_store(response: Response) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StorageError::Query(store_message(status, &body)))
}

#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    message: Option<String>,
}

fn store_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<StoreErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("store responded with {status}"))
}

/// PostgREST `in.(...)` filter; values are double-quoted so commas and
/// parentheses inside ids stay literal.
fn in_filter(ids: &[&QuestionId]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| {
            let escaped = id.as_str().replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{escaped}\"")
        })
        .collect();
    format!("in.({})", quoted.join(","))
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: QuestionId,
    question_number_in_book: u32,
}

#[async_trait]
impl QuestionRepository for HostedQuestionStore {
    async fn find_by_ids(&self, ids: &[QuestionId]) -> Result<Vec<QuestionRecord>, StorageError> {
        let ids = distinct_ids(ids);
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = [
            ("select", "*".to_string()),
            ("id", in_filter(&ids)),
            ("order", "question_number_in_book.asc,id.asc".to_string()),
        ];
        self.fetch(&query).await
    }

    async fn chapter_catalog(
        &self,
        book: &BookCode,
        chapter: &ChapterId,
    ) -> Result<Vec<CatalogEntry>, StorageError> {
        let query = [
            ("select", "id,question_number_in_book".to_string()),
            ("book_code", format!("eq.{book}")),
            ("chapter", format!("eq.{chapter}")),
            ("order", "question_number_in_book.asc,id.asc".to_string()),
        ];
        let rows: Vec<CatalogRow> = self.fetch(&query).await?;
        Ok(rows
            .into_iter()
            .map(|r| CatalogEntry::new(r.id, r.question_number_in_book))
            .collect())
    }

    async fn upsert_question(&self, record: &QuestionRecord) -> Result<(), StorageError> {
        let response = self
            .authorized(self.client.post(self.config.table_url()))
            .header("Prefer", "resolution=merge-duplicates")
            .json(record)
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        error_for_store(response).await?;
        Ok(())
    }
}

impl Storage {
    /// Build a `Storage` backed by the hosted REST store.
    ///
    /// # Errors
    ///
    /// Returns `HostedStoreError` if the HTTP client cannot be built.
    pub fn hosted(config: HostedStoreConfig) -> Result<Self, HostedStoreError> {
        Ok(Self::from_repository(HostedQuestionStore::new(config)?))
    }
}
