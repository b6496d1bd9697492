mod ids;
mod question;
mod selection;
mod session_config;

pub use ids::{BookCode, ChapterId, ParseIdError, QuestionId};
pub use question::{CatalogEntry, QuestionRecord, sort_by_book_order};
pub use selection::QuestionSelection;
pub use session_config::{
    ChapterSelection, PracticeSessionConfig, QuestionOrder, TestMode, ValidationError,
};
