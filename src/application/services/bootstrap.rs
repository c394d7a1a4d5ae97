//! Configuration bootstrap service
//!
//! Resolves the single config location for this run, creates the default
//! file when it is missing, and loads the document into memory.

use std::io;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::{
    default_config_path, env_overrides, legacy_config_path, EnvSource, DEFAULT_CONFIG_CONTENT,
};
use crate::domain::{ConfigLocation, ConfigSource, GlobalOptions, ProcessConfig};
use crate::infrastructure::traits::{FileSystem, HomeDir};

/// Outcome of a successful bootstrap.
#[derive(Debug, Clone, PartialEq)]
pub struct Bootstrapped {
    pub location: ConfigLocation,
    pub config: ProcessConfig,
    /// Whether this run created the config file
    pub created: bool,
}

/// Service that locates, creates and loads the configuration file.
pub struct ConfigResolver {
    fs: Arc<dyn FileSystem>,
    home: Arc<dyn HomeDir>,
    env: EnvSource,
}

impl ConfigResolver {
    /// Create a new resolver reading overrides from the process environment.
    pub fn new(fs: Arc<dyn FileSystem>, home: Arc<dyn HomeDir>) -> Self {
        Self {
            fs,
            home,
            env: EnvSource::Process,
        }
    }

    /// Replace the environment override source.
    pub fn with_env(mut self, env: EnvSource) -> Self {
        self.env = env;
        self
    }

    /// Run the full sequence: locate, ensure the file exists, load it.
    ///
    /// A default or legacy file that can't be read or parsed is treated as
    /// missing: `<home>/.apb.json` is rewritten as `{}` and loaded instead.
    /// An explicit `--config` file is never replaced.
    pub fn bootstrap(&self, options: &GlobalOptions) -> ApplicationResult<Bootstrapped> {
        let location = self.locate(options)?;
        let created = self.ensure_exists(&location)?;
        match self.load(&location) {
            Ok(config) => Ok(Bootstrapped {
                location,
                config,
                created,
            }),
            Err(err) if location.source != ConfigSource::Explicit && is_unusable(&err) => {
                warn!("Can't load config file: {err}");
                let location = self.reset_default()?;
                let config = self.load(&location)?;
                Ok(Bootstrapped {
                    location,
                    config,
                    created: true,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Decide which file this run uses.
    ///
    /// An explicit path always wins. Otherwise `<home>/.apb.json` is used,
    /// falling back to a legacy `<home>/.apb` only when that file exists.
    pub fn locate(&self, options: &GlobalOptions) -> ApplicationResult<ConfigLocation> {
        if let Some(path) = &options.config {
            debug!("locate: explicit config {}", path.display());
            return Ok(ConfigLocation::new(path.clone(), ConfigSource::Explicit));
        }

        let home = self
            .home
            .home_dir()
            .ok_or(ApplicationError::HomeDirUnavailable)?;
        debug!("locate: home={}", home.display());

        let default = default_config_path(&home);
        if self.fs.exists(&default) {
            return Ok(ConfigLocation::new(default, ConfigSource::Default));
        }

        let legacy = legacy_config_path(&home);
        if self.fs.is_file(&legacy) {
            debug!("locate: using legacy config {}", legacy.display());
            return Ok(ConfigLocation::new(legacy, ConfigSource::Legacy));
        }

        Ok(ConfigLocation::new(default, ConfigSource::Default))
    }

    /// Make sure a file exists at `location`.
    ///
    /// Only the default location is created; a missing explicit file is an
    /// error. Returns `true` if the file was created by this call.
    pub fn ensure_exists(&self, location: &ConfigLocation) -> ApplicationResult<bool> {
        let path = location.path();
        if self.fs.exists(path) {
            return Ok(false);
        }
        if !location.is_creatable() {
            return Err(ApplicationError::ConfigNotFound(path.to_path_buf()));
        }

        warn!("Didn't find config file, creating one at {}", path.display());
        self.fs
            .create_new(path, DEFAULT_CONFIG_CONTENT)
            .map_err(|source| ApplicationError::CreateConfig {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Overwrite `<home>/.apb.json` with `{}`.
    pub fn reset_default(&self) -> ApplicationResult<ConfigLocation> {
        let home = self
            .home
            .home_dir()
            .ok_or(ApplicationError::HomeDirUnavailable)?;
        let path = default_config_path(&home);

        warn!("Didn't find config file, creating one at {}", path.display());
        self.fs
            .write(&path, DEFAULT_CONFIG_CONTENT)
            .map_err(|source| ApplicationError::CreateConfig {
                path: path.clone(),
                source,
            })?;
        Ok(ConfigLocation::new(path, ConfigSource::Default))
    }

    /// Read and parse the file at `location`, then apply `APB_*` overrides.
    pub fn load(&self, location: &ConfigLocation) -> ApplicationResult<ProcessConfig> {
        let path = location.path();
        let content = self.fs.read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ApplicationError::ConfigNotFound(path.to_path_buf())
            } else {
                ApplicationError::ReadConfig {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let mut config = ProcessConfig::from_json_str(&content).map_err(|source| {
            ApplicationError::MalformedConfig {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let overrides = env_overrides(&self.env)?;
        if !overrides.is_empty() {
            debug!("load: applying {} environment override(s)", overrides.len());
            config.merge(overrides);
        }

        debug!(
            "load: {} ({}) with {} top-level key(s)",
            path.display(),
            location.source,
            config.len()
        );
        Ok(config)
    }
}

/// Read and parse failures count as "no config"; env override errors don't.
fn is_unusable(err: &ApplicationError) -> bool {
    matches!(
        err,
        ApplicationError::ConfigNotFound(_)
            | ApplicationError::ReadConfig { .. }
            | ApplicationError::MalformedConfig { .. }
    )
}
