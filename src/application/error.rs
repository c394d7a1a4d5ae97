//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors add path context to failures of the bootstrap sequence.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("cannot determine home directory")]
    HomeDirUnavailable,

    #[error("config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("can't read config {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't create config {}: {source}", path.display())]
    CreateConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't parse config {}: {source}", path.display())]
    MalformedConfig {
        path: PathBuf,
        #[source]
        source: DomainError,
    },

    #[error("invalid environment override: {message}")]
    EnvOverride { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
