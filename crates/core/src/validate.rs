//! Runtime validation of untyped practice-session configurations.
//!
//! Request bodies arrive as arbitrary JSON, so every field is shape-checked
//! before it is trusted. Numeric fields accept integers, floats (truncated
//! toward zero) and numeric strings.

use serde_json::{Map, Value};

use crate::model::{
    BookCode, ChapterId, ChapterSelection, PracticeSessionConfig, QuestionOrder, TestMode,
    ValidationError,
};

/// Validate and normalize a practice-session configuration.
///
/// Unselected chapters are dropped and the time limit is discarded outside
/// timed mode. `questionOrder` defaults to `sequential` and `testMode` to
/// `practice` when absent.
///
/// # Errors
///
/// Returns the first `ValidationError` encountered, checking the book code,
/// then chapters, then ordering and test mode.
pub fn validate_session_config(body: &Value) -> Result<PracticeSessionConfig, ValidationError> {
    let obj = body
        .as_object()
        .ok_or_else(|| ValidationError::malformed("body", "a JSON object"))?;

    let book_code = match obj.get("bookCode") {
        None | Some(Value::Null) => return Err(ValidationError::MissingBookCode),
        Some(Value::String(s)) if s.trim().is_empty() => {
            return Err(ValidationError::MissingBookCode);
        }
        Some(Value::String(s)) => BookCode::new(s.trim()),
        Some(_) => return Err(ValidationError::malformed("bookCode", "a string")),
    };

    let chapters = match obj.get("chapters") {
        None | Some(Value::Null) => return Err(ValidationError::NoChaptersSelected),
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(ValidationError::malformed(
                "chapters",
                "an object keyed by chapter id",
            ));
        }
    };

    let mut selected = Vec::with_capacity(chapters.len());
    for (key, raw) in chapters {
        if let Some(entry) = chapter_selection(key, raw)? {
            selected.push(entry);
        }
    }
    if selected.is_empty() {
        return Err(ValidationError::NoChaptersSelected);
    }

    let question_order = match obj.get("questionOrder") {
        None | Some(Value::Null) => QuestionOrder::default(),
        Some(Value::String(s)) => s.trim().parse()?,
        Some(_) => return Err(ValidationError::malformed("questionOrder", "a string")),
    };

    let test_mode = match obj.get("testMode") {
        None | Some(Value::Null) => TestMode::Practice,
        Some(Value::String(s)) => match s.trim() {
            "practice" => TestMode::Practice,
            "timed" => TestMode::timed(coerce_int(
                obj.get("timeLimitInMinutes"),
                "timeLimitInMinutes",
            )?)?,
            _ => {
                return Err(ValidationError::malformed(
                    "testMode",
                    "one of practice, timed",
                ));
            }
        },
        Some(_) => return Err(ValidationError::malformed("testMode", "a string")),
    };

    PracticeSessionConfig::new(book_code, selected, question_order, test_mode)
}

/// Returns `None` for chapters that are not selected.
fn chapter_selection(
    key: &str,
    raw: &Value,
) -> Result<Option<(ChapterId, ChapterSelection)>, ValidationError> {
    let field = |name: &str| format!("chapters.{key}.{name}");

    let entry = raw
        .as_object()
        .ok_or_else(|| ValidationError::malformed(format!("chapters.{key}"), "an object"))?;

    match entry.get("selected") {
        None | Some(Value::Null | Value::Bool(false)) => return Ok(None),
        Some(Value::Bool(true)) => {}
        Some(_) => return Err(ValidationError::malformed(field("selected"), "a boolean")),
    }

    let chapter: ChapterId = key
        .parse()
        .map_err(|_| ValidationError::malformed("chapters", "non-blank chapter ids"))?;

    let mode = entry
        .get("mode")
        .and_then(Value::as_str)
        .ok_or_else(|| ValidationError::malformed(field("mode"), "one of range, quantity"))?;

    let empty = Map::new();
    let values = match entry.get("values") {
        None | Some(Value::Null) => &empty,
        Some(Value::Object(map)) => map,
        Some(_) => return Err(ValidationError::malformed(field("values"), "an object")),
    };

    // A missing bound is treated like a non-positive one.
    let selection = match mode.trim() {
        "range" => {
            let start = coerce_int(values.get("start"), &field("values.start"))?;
            let end = coerce_int(values.get("end"), &field("values.end"))?;
            ChapterSelection::range(&chapter, start.unwrap_or(0), end.unwrap_or(0))?
        }
        "quantity" => {
            let count = coerce_int(values.get("count"), &field("values.count"))?;
            ChapterSelection::quantity(&chapter, count.unwrap_or(0))?
        }
        _ => {
            return Err(ValidationError::malformed(
                field("mode"),
                "one of range, quantity",
            ));
        }
    };

    Ok(Some((chapter, selection)))
}

/// Coerce a JSON value to an integer. `None` means absent or null.
fn coerce_int(value: Option<&Value>, field: &str) -> Result<Option<i64>, ValidationError> {
    let malformed = || ValidationError::malformed(field, "an integer");
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Ok(Some(i)),
            None => n.as_f64().and_then(truncate).map(Some).ok_or_else(malformed),
        },
        Some(Value::String(s)) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Some(i));
            }
            s.parse::<f64>()
                .ok()
                .and_then(truncate)
                .map(Some)
                .ok_or_else(malformed)
        }
        Some(_) => Err(malformed()),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn truncate(f: f64) -> Option<i64> {
    if !f.is_finite() || f >= i64::MAX as f64 || f <= i64::MIN as f64 {
        return None;
    }
    Some(f.trunc() as i64)
}
