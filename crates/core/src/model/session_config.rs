use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{BookCode, ChapterId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("bookCode is required")]
    MissingBookCode,

    #[error("at least one chapter must be selected")]
    NoChaptersSelected,

    #[error("chapter {chapter}: range must satisfy 0 < start <= end")]
    InvalidRange { chapter: ChapterId },

    #[error("chapter {chapter}: question count must be greater than 0")]
    InvalidQuantity { chapter: ChapterId },

    #[error("timeLimitInMinutes is required for timed tests")]
    MissingTimeLimit,

    #[error("timeLimitInMinutes must be greater than 0")]
    InvalidTimeLimit,

    #[error("{field}: expected {expected}")]
    Malformed {
        field: String,
        expected: &'static str,
    },
}

impl ValidationError {
    /// Stable machine-readable name of the failure.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingBookCode => "MissingBookCode",
            Self::NoChaptersSelected => "NoChaptersSelected",
            Self::InvalidRange { .. } => "InvalidRange",
            Self::InvalidQuantity { .. } => "InvalidQuantity",
            Self::MissingTimeLimit => "MissingTimeLimit",
            Self::InvalidTimeLimit => "InvalidTimeLimit",
            Self::Malformed { .. } => "Malformed",
        }
    }

    pub(crate) fn malformed(field: impl Into<String>, expected: &'static str) -> Self {
        Self::Malformed {
            field: field.into(),
            expected,
        }
    }
}

//
// ─── CHAPTER SELECTION ─────────────────────────────────────────────────────────
//

/// How questions are picked from a single chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterSelection {
    /// 1-based positions `start..=end` within the chapter.
    Range { start: u32, end: u32 },
    /// `count` questions drawn at random from the chapter.
    Quantity { count: u32 },
}

impl ChapterSelection {
    /// Build a range selection.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidRange` unless `0 < start <= end`.
    pub fn range(chapter: &ChapterId, start: i64, end: i64) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidRange {
            chapter: chapter.clone(),
        };
        if start <= 0 || end <= 0 || start > end {
            return Err(invalid());
        }
        let start = u32::try_from(start).map_err(|_| invalid())?;
        let end = u32::try_from(end).map_err(|_| invalid())?;
        Ok(Self::Range { start, end })
    }

    /// Build a quantity selection.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidQuantity` unless `count > 0`.
    pub fn quantity(chapter: &ChapterId, count: i64) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidQuantity {
            chapter: chapter.clone(),
        };
        if count <= 0 {
            return Err(invalid());
        }
        let count = u32::try_from(count).map_err(|_| invalid())?;
        Ok(Self::Quantity { count })
    }

    fn check(self, chapter: &ChapterId) -> Result<Self, ValidationError> {
        match self {
            Self::Range { start, end } => Self::range(chapter, start.into(), end.into()),
            Self::Quantity { count } => Self::quantity(chapter, count.into()),
        }
    }
}

//
// ─── ORDER & MODE ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionOrder {
    Shuffle,
    Interleaved,
    #[default]
    Sequential,
}

impl QuestionOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shuffle => "shuffle",
            Self::Interleaved => "interleaved",
            Self::Sequential => "sequential",
        }
    }
}

impl FromStr for QuestionOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shuffle" => Ok(Self::Shuffle),
            "interleaved" => Ok(Self::Interleaved),
            "sequential" => Ok(Self::Sequential),
            _ => Err(ValidationError::malformed(
                "questionOrder",
                "one of shuffle, interleaved, sequential",
            )),
        }
    }
}

impl fmt::Display for QuestionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the session runs against the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestMode {
    #[default]
    Practice,
    Timed { time_limit_minutes: u32 },
}

impl TestMode {
    /// Build a timed mode from an optional raw limit.
    ///
    /// # Errors
    ///
    /// Returns `MissingTimeLimit` when no limit is given and `InvalidTimeLimit`
    /// when it is not positive.
    pub fn timed(limit: Option<i64>) -> Result<Self, ValidationError> {
        let limit = limit.ok_or(ValidationError::MissingTimeLimit)?;
        if limit <= 0 {
            return Err(ValidationError::InvalidTimeLimit);
        }
        let time_limit_minutes =
            u32::try_from(limit).map_err(|_| ValidationError::InvalidTimeLimit)?;
        Ok(Self::Timed { time_limit_minutes })
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Practice => "practice",
            Self::Timed { .. } => "timed",
        }
    }

    #[must_use]
    pub fn time_limit_minutes(self) -> Option<u32> {
        match self {
            Self::Practice => None,
            Self::Timed { time_limit_minutes } => Some(time_limit_minutes),
        }
    }
}

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// A validated, normalized practice-session configuration.
///
/// Only selected chapters are kept, in chapter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeSessionConfig {
    book_code: BookCode,
    chapters: BTreeMap<ChapterId, ChapterSelection>,
    question_order: QuestionOrder,
    test_mode: TestMode,
}

impl PracticeSessionConfig {
    /// Creates a config from already-typed parts.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the book code is blank, no chapter is
    /// given, a chapter id repeats, or a chapter selection or time limit is
    /// out of bounds.
    pub fn new(
        book_code: BookCode,
        chapters: impl IntoIterator<Item = (ChapterId, ChapterSelection)>,
        question_order: QuestionOrder,
        test_mode: TestMode,
    ) -> Result<Self, ValidationError> {
        if book_code.as_str().trim().is_empty() {
            return Err(ValidationError::MissingBookCode);
        }

        let mut checked = BTreeMap::new();
        for (chapter, selection) in chapters {
            let selection = selection.check(&chapter)?;
            if checked.contains_key(&chapter) {
                return Err(ValidationError::malformed("chapters", "unique chapter ids"));
            }
            checked.insert(chapter, selection);
        }
        if checked.is_empty() {
            return Err(ValidationError::NoChaptersSelected);
        }

        if let TestMode::Timed { time_limit_minutes } = test_mode {
            if time_limit_minutes == 0 {
                return Err(ValidationError::InvalidTimeLimit);
            }
        }

        Ok(Self {
            book_code,
            chapters: checked,
            question_order,
            test_mode,
        })
    }

    #[must_use]
    pub fn book_code(&self) -> &BookCode {
        &self.book_code
    }

    #[must_use]
    pub fn chapters(&self) -> &BTreeMap<ChapterId, ChapterSelection> {
        &self.chapters
    }

    #[must_use]
    pub fn question_order(&self) -> QuestionOrder {
        self.question_order
    }

    #[must_use]
    pub fn test_mode(&self) -> TestMode {
        self.test_mode
    }
}
