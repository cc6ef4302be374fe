//! Wildcard DNS Domain Layer
pub mod config;
pub mod errors;
pub mod question_key;

pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use question_key::QuestionKey;
