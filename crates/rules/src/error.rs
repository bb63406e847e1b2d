//! Error types for rule construction and execution
//!
//! Validation failures are not errors: they go to the validation log.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuleError>;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Document error: {0}")]
    Dom(#[from] dom::DomError),

    #[error("Rule file error: {0}")]
    RuleFile(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
