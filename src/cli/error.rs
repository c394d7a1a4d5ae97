//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Args(#[from] clap::Error),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),

    #[error("{name}: {source}")]
    Command {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        ApplicationError::from(e).into()
    }
}

impl CliError {
    /// Wrap an error returned by a command's own logic.
    pub fn command(
        name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        CliError::Command {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Args(_) | CliError::InvalidArgs(_) | CliError::Usage(_) => {
                crate::exitcode::USAGE
            }
            CliError::Command { .. } => crate::exitcode::SOFTWARE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Logging { .. } => crate::exitcode::SOFTWARE,
                InfraError::Application(e) => match e {
                    ApplicationError::HomeDirUnavailable => crate::exitcode::OSERR,
                    ApplicationError::ConfigNotFound(_) => crate::exitcode::NOINPUT,
                    ApplicationError::ReadConfig { .. } => crate::exitcode::IOERR,
                    ApplicationError::CreateConfig { .. } => crate::exitcode::CANTCREAT,
                    ApplicationError::MalformedConfig { .. }
                    | ApplicationError::EnvOverride { .. }
                    | ApplicationError::Domain(_) => crate::exitcode::CONFIG,
                },
            },
        }
    }
}
