//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, ValueHint};

use crate::domain::GlobalOptions;

/// Program name, also used for completion scripts.
pub const BIN_NAME: &str = "apb";

/// Flags available to every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default is $HOME/.apb.json)
    #[arg(long, global = true, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn into_options(self) -> GlobalOptions {
        GlobalOptions::new(self.verbose, self.config)
    }
}

/// Arguments of `apb config get`.
#[derive(Args, Debug, Clone)]
pub struct ConfigGetArgs {
    /// Dotted key, e.g. `registry.url`
    pub key: String,
}

/// Arguments of `apb completion`.
#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    /// Shell type
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// The bare root command carrying only the global flags.
pub fn root_command() -> clap::Command {
    let root = clap::Command::new(BIN_NAME)
        .about("Tool for working with Ansible Playbook Bundles")
        .version(env!("CARGO_PKG_VERSION"))
        .propagate_version(true);
    GlobalArgs::augment_args(root)
}
