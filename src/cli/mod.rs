//! CLI layer: argument parsing, command tree and dispatch

pub mod args;
pub mod commands;
pub mod dispatch;
pub mod error;
pub mod output;

pub use args::{GlobalArgs, BIN_NAME};
pub use commands::builtin_commands;
pub use dispatch::{Command, CommandTree, RootDispatcher};
pub use error::{CliError, CliResult};
