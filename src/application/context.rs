//! Per-run context handed to every command

use crate::application::services::Bootstrapped;
use crate::domain::{ConfigLocation, GlobalOptions, ProcessConfig};

/// Everything a command may read about the current run.
///
/// Built once after the bootstrap sequence and never mutated.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub options: GlobalOptions,
    pub location: ConfigLocation,
    pub config: ProcessConfig,
    /// Whether the config file was created during this run
    pub created: bool,
    /// The full command tree as parsed, for help and completion output
    pub cli: clap::Command,
}

impl AppContext {
    pub fn new(options: GlobalOptions, bootstrapped: Bootstrapped, cli: clap::Command) -> Self {
        Self {
            options,
            location: bootstrapped.location,
            config: bootstrapped.config,
            created: bootstrapped.created,
            cli,
        }
    }
}
