//! Core domain entities for the bootstrap sequence

use std::fmt;
use std::path::{Path, PathBuf};

/// Global flags shared by every command.
///
/// Built once from the parsed command line and never changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    /// Raise log level to debug before the command runs
    pub verbose: bool,
    /// Explicit config file; `None` means the default location
    pub config: Option<PathBuf>,
}

impl GlobalOptions {
    /// Create options, normalizing an empty config path to `None` and
    /// expanding `~` / `$VAR` in a non-empty one.
    pub fn new(verbose: bool, config: Option<PathBuf>) -> Self {
        let config = config
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| match p.to_str() {
                Some(s) => PathBuf::from(expand_env_vars(s)),
                // not UTF-8: nothing shellexpand could expand, keep the bytes
                None => p,
            });
        Self { verbose, config }
    }
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Passed via `--config`
    Explicit,
    /// `<home>/.apb.json`
    Default,
    /// `<home>/.apb`, read when the canonical file is absent
    Legacy,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConfigSource::Explicit => "explicit",
            ConfigSource::Default => "default",
            ConfigSource::Legacy => "legacy",
        };
        f.write_str(s)
    }
}

/// The single configuration path used for a process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    pub source: ConfigSource,
}

impl ConfigLocation {
    pub fn new(path: impl Into<PathBuf>, source: ConfigSource) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a missing file at this location may be created.
    ///
    /// Only the canonical default location is self-healing.
    pub fn is_creatable(&self) -> bool {
        self.source == ConfigSource::Default
    }
}

/// Expand shell variables and tilde in a path string.
///
/// Returns the input unchanged if expansion fails (e.g. undefined variable).
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
