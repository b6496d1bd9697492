#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod practice;

pub use portal_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, PracticeError, ResolveError};
pub use practice::{
    ChapterCatalog, PracticeService, PracticeSession, QuestionResolver, ResolvedQuestions,
    SelectionPlanner,
};
