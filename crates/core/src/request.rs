//! Shape checks for the practice-questions request body.

use serde_json::Value;
use thiserror::Error;

use crate::model::QuestionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RequestError {
    #[error("questionIds is required")]
    MissingQuestionIds,

    #[error("questionIds must be an array")]
    NotAnArray,

    #[error("questionIds must not be empty")]
    EmptyQuestionIds,

    #[error("questionIds[{index}] must be a non-empty string")]
    NonStringQuestionId { index: usize },

    #[error("request body must be a JSON object")]
    NotAnObject,
}

/// Extract `questionIds` from a `{ "questionIds": [...] }` body.
///
/// Order and duplicates are preserved; the store decides what comes back.
///
/// # Errors
///
/// Returns `RequestError` when the field is missing, is not an array, is
/// empty, or holds anything other than non-blank strings.
pub fn parse_question_ids(body: &Value) -> Result<Vec<QuestionId>, RequestError> {
    let obj = body.as_object().ok_or(RequestError::NotAnObject)?;
    let raw = match obj.get("questionIds") {
        None | Some(Value::Null) => return Err(RequestError::MissingQuestionIds),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(RequestError::NotAnArray),
    };
    if raw.is_empty() {
        return Err(RequestError::EmptyQuestionIds);
    }

    raw.iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_str()
                .and_then(|s| s.parse::<QuestionId>().ok())
                .ok_or(RequestError::NonStringQuestionId { index })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_ids_in_caller_order() {
        let ids = parse_question_ids(&json!({ "questionIds": ["q3", "q1", "q3"] })).unwrap();
        let ids: Vec<_> = ids.iter().map(QuestionId::as_str).collect();
        assert_eq!(ids, vec!["q3", "q1", "q3"]);
    }

    #[test]
    fn rejects_missing_non_array_and_empty() {
        assert_eq!(
            parse_question_ids(&json!({})),
            Err(RequestError::MissingQuestionIds)
        );
        assert_eq!(
            parse_question_ids(&json!({ "questionIds": "q1" })),
            Err(RequestError::NotAnArray)
        );
        assert_eq!(
            parse_question_ids(&json!({ "questionIds": [] })),
            Err(RequestError::EmptyQuestionIds)
        );
        assert_eq!(
            parse_question_ids(&json!("q1")),
            Err(RequestError::NotAnObject)
        );
    }

    #[test]
    fn rejects_non_string_members() {
        assert_eq!(
            parse_question_ids(&json!({ "questionIds": ["q1", 2] })),
            Err(RequestError::NonStringQuestionId { index: 1 })
        );
        assert_eq!(
            parse_question_ids(&json!({ "questionIds": ["  "] })),
            Err(RequestError::NonStringQuestionId { index: 0 })
        );
    }
}
