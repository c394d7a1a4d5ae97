use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};

use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::infrastructure::traits::{HomeDir, LevelControl};
use crate::infrastructure::InfraResult;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // Create a filter for noisy modules
    let noisy_modules = ["config"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Set up the subscriber with environment filter
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Home directory fixed at construction (or absent).
#[derive(Debug, Clone, Default)]
pub struct FixedHomeDir(Option<PathBuf>);

impl FixedHomeDir {
    pub fn at(path: &Path) -> Self {
        Self(Some(path.to_path_buf()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl HomeDir for FixedHomeDir {
    fn home_dir(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// Level control that remembers every level it was asked to set.
#[derive(Debug, Default)]
pub struct RecordingLevelControl {
    levels: Mutex<Vec<LevelFilter>>,
}

impl RecordingLevelControl {
    pub fn recorded(&self) -> Vec<LevelFilter> {
        self.levels
            .lock()
            .map(|levels| levels.clone())
            .unwrap_or_default()
    }
}

impl LevelControl for RecordingLevelControl {
    fn set_level(&self, level: LevelFilter) -> InfraResult<()> {
        if let Ok(mut levels) = self.levels.lock() {
            levels.push(level);
        }
        Ok(())
    }
}
