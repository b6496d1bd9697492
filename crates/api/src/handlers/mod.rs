pub mod health;
pub mod practice_questions;
pub mod practice_sessions;
