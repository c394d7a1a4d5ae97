//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent an invalid configuration document.
/// These are independent of where the document came from.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected a JSON object at top level, found {found}")]
    NotAnObject { found: &'static str },
}
