#![forbid(unsafe_code)]

pub mod hosted;
pub mod repository;
pub mod sqlite;

pub use repository::{InMemoryRepository, QuestionRepository, Storage, StorageError};
