//! Configuration file naming and environment overrides
//!
//! Lookup (first existing wins, unless `--config` is given):
//! 1. `<home>/.apb.json` (canonical, created as `{}` when nothing exists)
//! 2. `<home>/.apb` (legacy name, read only)
//!
//! After parsing, `APB_*` environment variables are overlaid onto the
//! document (`APB_REGISTRY__URL` sets `registry.url`).

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use serde_json::{Map, Value};

use crate::application::{ApplicationError, ApplicationResult};

/// Canonical config file name in the home directory.
pub const CONFIG_FILE_NAME: &str = ".apb.json";

/// Legacy config file name, still honored when present.
pub const LEGACY_CONFIG_FILE_NAME: &str = ".apb";

/// Content written to a freshly created config file.
pub const DEFAULT_CONFIG_CONTENT: &str = "{}";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "APB";

/// Separator for nested keys in environment overrides.
pub const ENV_SEPARATOR: &str = "__";

/// Get the path to the canonical config file.
pub fn default_config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_FILE_NAME)
}

/// Get the path to the legacy config file.
pub fn legacy_config_path(home: &Path) -> PathBuf {
    home.join(LEGACY_CONFIG_FILE_NAME)
}

/// Where environment overrides are read from.
#[derive(Debug, Clone, Default)]
pub enum EnvSource {
    /// The real process environment
    #[default]
    Process,
    /// A fixed set of variables (for tests)
    Fixed(config::Map<String, String>),
    /// No overrides at all
    Disabled,
}

/// Collect `APB_*` environment variables as a nested JSON object.
///
/// Keys are lowercased, `__` separates nesting levels and values are
/// parsed into booleans or numbers where possible.
pub fn env_overrides(source: &EnvSource) -> ApplicationResult<Map<String, Value>> {
    let fixed = match source {
        EnvSource::Disabled => return Ok(Map::new()),
        EnvSource::Process => None,
        EnvSource::Fixed(vars) => Some(vars.clone()),
    };

    let env = Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
        .ignore_empty(true)
        .source(fixed);

    let config = Config::builder()
        .add_source(env)
        .build()
        .map_err(config_err)?;

    config
        .try_deserialize::<Map<String, Value>>()
        .map_err(config_err)
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::EnvOverride {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixed(vars: &[(&str, &str)]) -> EnvSource {
        EnvSource::Fixed(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn given_home_when_building_paths_then_uses_dotfile_names() {
        let home = Path::new("/home/user");
        assert_eq!(default_config_path(home), PathBuf::from("/home/user/.apb.json"));
        assert_eq!(legacy_config_path(home), PathBuf::from("/home/user/.apb"));
    }

    #[test]
    fn given_no_variables_when_collecting_overrides_then_empty() {
        let overrides = env_overrides(&fixed(&[])).unwrap();
        assert!(overrides.is_empty());
    }

    #[test]
    fn given_disabled_source_when_collecting_overrides_then_empty() {
        assert!(env_overrides(&EnvSource::Disabled).unwrap().is_empty());
    }

    #[test]
    fn given_nested_variable_when_collecting_overrides_then_builds_object() {
        let overrides = env_overrides(&fixed(&[
            ("APB_REGISTRY__URL", "https://r.example"),
            ("APB_DEBUG", "true"),
            ("OTHER_VAR", "ignored"),
        ]))
        .unwrap();

        assert_eq!(
            Value::Object(overrides),
            json!({"registry": {"url": "https://r.example"}, "debug": true})
        );
    }
}
