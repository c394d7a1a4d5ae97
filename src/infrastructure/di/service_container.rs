//! Service container for dependency injection
//!
//! Wires up the bootstrap services with their dependencies.

use std::sync::Arc;

use crate::application::services::ConfigResolver;
use crate::config::EnvSource;
use crate::infrastructure::traits::{
    FileSystem, HomeDir, LevelControl, PlatformHomeDir, RealFileSystem,
};

/// Container holding the I/O boundaries the dispatcher needs.
pub struct ServiceContainer {
    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Home directory lookup
    pub home: Arc<dyn HomeDir>,

    /// Process-wide log level
    pub levels: Arc<dyn LevelControl>,

    /// Source for `APB_*` overrides
    pub env: EnvSource,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(levels: Arc<dyn LevelControl>) -> Self {
        Self::with_deps(Arc::new(RealFileSystem), Arc::new(PlatformHomeDir), levels)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        fs: Arc<dyn FileSystem>,
        home: Arc<dyn HomeDir>,
        levels: Arc<dyn LevelControl>,
    ) -> Self {
        Self {
            fs,
            home,
            levels,
            env: EnvSource::Process,
        }
    }

    /// Replace the environment override source.
    pub fn with_env(mut self, env: EnvSource) -> Self {
        self.env = env;
        self
    }

    /// Build the config resolver over this container's boundaries.
    pub fn config_resolver(&self) -> ConfigResolver {
        ConfigResolver::new(Arc::clone(&self.fs), Arc::clone(&self.home))
            .with_env(self.env.clone())
    }
}
