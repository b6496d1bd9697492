use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{BookCode, ChapterId, QuestionId};

/// A question as held by the store.
///
/// Field names follow the store's column names so records can be passed
/// through to clients unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub book_code: BookCode,
    pub chapter: ChapterId,
    pub question_number_in_book: u32,
    pub prompt: String,
    #[serde(default)]
    pub options: serde_json::Value,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Minimal catalog row used when planning a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: QuestionId,
    pub question_number_in_book: u32,
}

impl CatalogEntry {
    #[must_use]
    pub fn new(id: QuestionId, question_number_in_book: u32) -> Self {
        Self {
            id,
            question_number_in_book,
        }
    }
}

impl From<&QuestionRecord> for CatalogEntry {
    fn from(record: &QuestionRecord) -> Self {
        Self::new(record.id.clone(), record.question_number_in_book)
    }
}

/// Sorts records into book order, breaking ties by id.
pub fn sort_by_book_order(records: &mut [QuestionRecord]) {
    records.sort_by(|a, b| {
        a.question_number_in_book
            .cmp(&b.question_number_in_book)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn record(id: &str, number: u32) -> QuestionRecord {
        QuestionRecord {
            id: QuestionId::new(id),
            book_code: BookCode::new("b"),
            chapter: ChapterId::new("1"),
            question_number_in_book: number,
            prompt: format!("prompt {id}"),
            options: serde_json::Value::Null,
            answer: None,
            explanation: None,
            created_at: fixed_now(),
        }
    }

    #[test]
    fn book_order_breaks_ties_by_id() {
        let mut records = vec![record("b", 3), record("a", 3), record("c", 1)];
        sort_by_book_order(&mut records);
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn record_serializes_with_store_column_names() {
        let value = serde_json::to_value(record("q1", 10)).unwrap();
        assert_eq!(value["id"], "q1");
        assert_eq!(value["question_number_in_book"], 10);
        assert_eq!(value["book_code"], "b");
    }
}
