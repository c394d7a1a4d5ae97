//! I/O boundary traits for testability
//!
//! These traits abstract the filesystem, the user's home directory, and the
//! active log level, allowing the bootstrap sequence and the dispatcher to be
//! tested with mock implementations.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{reload, Registry};

use crate::infrastructure::{InfraError, InfraResult};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Create a new file with `content`, never truncating an existing one.
    ///
    /// Returns `Ok(false)` if the file already existed.
    fn create_new(&self, path: &Path, content: &str) -> io::Result<bool>;

    /// Write `content` to `path`, truncating any existing file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;
}

/// Home directory lookup.
pub trait HomeDir: Send + Sync {
    /// The current user's home directory, if it can be determined.
    fn home_dir(&self) -> Option<PathBuf>;
}

/// Control over the process-wide log level.
pub trait LevelControl: Send + Sync {
    /// Replace the active maximum level.
    fn set_level(&self, level: LevelFilter) -> InfraResult<()>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_new(&self, path: &Path, content: &str) -> io::Result<bool> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(e),
        };
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(true)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }
}

/// Home directory from the platform (`$HOME` on Unix).
#[derive(Debug, Default)]
pub struct PlatformHomeDir;

impl HomeDir for PlatformHomeDir {
    fn home_dir(&self) -> Option<PathBuf> {
        directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
    }
}

/// Log level control backed by a `tracing_subscriber` reload handle.
#[derive(Clone)]
pub struct ReloadLevelControl {
    handle: reload::Handle<LevelFilter, Registry>,
}

impl ReloadLevelControl {
    pub fn new(handle: reload::Handle<LevelFilter, Registry>) -> Self {
        Self { handle }
    }
}

impl LevelControl for ReloadLevelControl {
    fn set_level(&self, level: LevelFilter) -> InfraResult<()> {
        self.handle
            .modify(|filter| *filter = level)
            .map_err(|e| InfraError::Logging {
                message: e.to_string(),
            })
    }
}
