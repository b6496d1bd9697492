use portal_core::model::{BookCode, CatalogEntry, ChapterId, QuestionId, QuestionRecord};

use super::{
    SqliteRepository,
    mapping::{ids_to_json, map_catalog_row, map_question_row, options_to_text},
};
use crate::repository::{QuestionRepository, StorageError, distinct_ids};

fn query_err(e: sqlx::Error) -> StorageError {
    StorageError::Query(e.to_string())
}

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn find_by_ids(&self, ids: &[QuestionId]) -> Result<Vec<QuestionRecord>, StorageError> {
        let ids = distinct_ids(ids);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let id_list = ids_to_json(&ids)?;
        let rows = sqlx::query(
            r"
            SELECT
                id, book_code, chapter, question_number_in_book, prompt, options,
                answer, explanation, created_at
            FROM questions
            WHERE id IN (SELECT value FROM json_each(?1))
            ORDER BY question_number_in_book ASC, id ASC
            ",
        )
        .bind(id_list)
        .fetch_all(&self.pool)
        .await
        .map_err(query_err)?;

        rows.iter().map(map_question_row).collect()
    }

    async fn chapter_catalog(
        &self,
        book: &BookCode,
        chapter: &ChapterId,
    ) -> Result<Vec<CatalogEntry>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, question_number_in_book
            FROM questions
            WHERE book_code = ?1 AND chapter = ?2
            ORDER BY question_number_in_book ASC, id ASC
            ",
        )
        .bind(book.as_str())
        .bind(chapter.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(query_err)?;

        rows.iter().map(map_catalog_row).collect()
    }

    async fn upsert_question(&self, record: &QuestionRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO questions (
                id, book_code, chapter, question_number_in_book, prompt, options,
                answer, explanation, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                -- created_at stays as first inserted
                book_code = excluded.book_code,
                chapter = excluded.chapter,
                question_number_in_book = excluded.question_number_in_book,
                prompt = excluded.prompt,
                options = excluded.options,
                answer = excluded.answer,
                explanation = excluded.explanation
            ",
        )
        .bind(record.id.as_str())
        .bind(record.book_code.as_str())
        .bind(record.chapter.as_str())
        .bind(i64::from(record.question_number_in_book))
        .bind(record.prompt.as_str())
        .bind(options_to_text(&record.options)?)
        .bind(record.answer.as_deref())
        .bind(record.explanation.as_deref())
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
