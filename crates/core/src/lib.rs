#![forbid(unsafe_code)]

pub mod model;
pub mod request;
pub mod time;
pub mod validate;

pub use request::{RequestError, parse_question_ids};
pub use time::Clock;
pub use validate::validate_session_config;
