//! apb: tool for working with Ansible Playbook Bundles
//!
//! Layers, innermost first:
//! - `domain`: options, config location and the configuration document
//! - `application`: the bootstrap service and the per-run context
//! - `infrastructure`: filesystem, home directory and log level boundaries
//! - `cli`: global flags, command tree and dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::{AppContext, ApplicationError};
pub use cli::{CliError, CliResult, Command, CommandTree, RootDispatcher};
pub use domain::{ConfigLocation, ConfigSource, GlobalOptions, ProcessConfig};
