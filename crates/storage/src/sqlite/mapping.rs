use portal_core::model::{BookCode, CatalogEntry, ChapterId, QuestionId, QuestionRecord};
use sqlx::Row;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn number_from_i64(v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| {
        StorageError::Serialization(format!("invalid question_number_in_book: {v}"))
    })
}

pub(crate) fn options_to_text(options: &serde_json::Value) -> Result<String, StorageError> {
    serde_json::to_string(options).map_err(ser)
}

/// Id list bound as one JSON array parameter, expanded with `json_each`.
pub(crate) fn ids_to_json(ids: &[&QuestionId]) -> Result<String, StorageError> {
    let raw: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
    serde_json::to_string(&raw).map_err(ser)
}

pub(crate) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<QuestionRecord, StorageError> {
    let options_text: String = row.try_get("options").map_err(ser)?;
    let options = serde_json::from_str(&options_text).map_err(ser)?;

    Ok(QuestionRecord {
        id: QuestionId::new(row.try_get::<String, _>("id").map_err(ser)?),
        book_code: BookCode::new(row.try_get::<String, _>("book_code").map_err(ser)?),
        chapter: ChapterId::new(row.try_get::<String, _>("chapter").map_err(ser)?),
        question_number_in_book: number_from_i64(
            row.try_get::<i64, _>("question_number_in_book").map_err(ser)?,
        )?,
        prompt: row.try_get("prompt").map_err(ser)?,
        options,
        answer: row.try_get("answer").map_err(ser)?,
        explanation: row.try_get("explanation").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_catalog_row(row: &sqlx::sqlite::SqliteRow) -> Result<CatalogEntry, StorageError> {
    Ok(CatalogEntry::new(
        QuestionId::new(row.try_get::<String, _>("id").map_err(ser)?),
        number_from_i64(row.try_get::<i64, _>("question_number_in_book").map_err(ser)?)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_numbers_are_rejected() {
        assert!(number_from_i64(-1).is_err());
        assert_eq!(number_from_i64(12).unwrap(), 12);
    }

    #[test]
    fn id_list_is_a_json_string_array() {
        let a = QuestionId::new("q1");
        let b = QuestionId::new("with \"quote\"");
        assert_eq!(ids_to_json(&[&a, &b]).unwrap(), r#"["q1","with \"quote\""]"#);
    }

    #[test]
    fn options_round_trip_as_json_text() {
        let text = options_to_text(&serde_json::json!(["x", "y"])).unwrap();
        assert_eq!(text, r#"["x","y"]"#);
    }
}
