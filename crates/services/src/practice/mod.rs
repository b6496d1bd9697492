mod plan;
mod resolver;
mod service;

// Public API of the practice subsystem.
pub use crate::error::{PracticeError, ResolveError};
pub use plan::{ChapterCatalog, SelectionPlanner};
pub use resolver::{QuestionResolver, ResolvedQuestions};
pub use service::{PracticeService, PracticeSession};
