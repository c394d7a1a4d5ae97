//! In-memory configuration document
//!
//! A `ProcessConfig` is a JSON object loaded once at startup and read by
//! commands for the rest of the run. Keys may be addressed with dots:
//! `registry.url` reads `{"registry": {"url": ...}}`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::DomainError;

/// Key separator for nested lookups.
pub const KEY_SEPARATOR: char = '.';

/// Loaded configuration document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessConfig {
    values: Map<String, Value>,
}

impl ProcessConfig {
    /// Empty configuration, equivalent to `{}`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Parse a JSON document. The top-level value must be an object.
    pub fn from_json_str(content: &str) -> Result<Self, DomainError> {
        match serde_json::from_str::<Value>(content)? {
            Value::Object(values) => Ok(Self { values }),
            other => Err(DomainError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    /// Look up a value by (possibly dotted) key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        if key.is_empty() {
            return None;
        }
        let mut segments = key.split(KEY_SEPARATOR);
        let first = segments.next()?;
        let mut current = self.values.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// String value at `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Boolean value at `key`, if present and a bool.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Deserialize the value at `key` into `T`.
    ///
    /// Returns `Ok(None)` when the key is absent.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DomainError> {
        self.get(key)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
            .map_err(DomainError::from)
    }

    /// Deserialize the whole document into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, DomainError> {
        Ok(serde_json::from_value(Value::Object(self.values.clone()))?)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Deep-merge `overlay` onto this document.
    ///
    /// Nested objects merge key by key; any other overlay value replaces
    /// the existing one.
    pub fn merge(&mut self, overlay: Map<String, Value>) {
        merge_maps(&mut self.values, overlay);
    }

    /// Render as pretty-printed JSON.
    pub fn to_pretty_json(&self) -> Result<String, DomainError> {
        Ok(serde_json::to_string_pretty(&self.values)?)
    }
}

fn merge_maps(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_maps(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> ProcessConfig {
        match value {
            Value::Object(map) => ProcessConfig::from_map(map),
            _ => panic!("test document must be an object"),
        }
    }

    #[test]
    fn given_empty_object_when_parsing_then_config_is_empty() {
        let config = ProcessConfig::from_json_str("{}").unwrap();
        assert!(config.is_empty());
        assert_eq!(config, ProcessConfig::empty());
    }

    #[test]
    fn given_malformed_json_when_parsing_then_invalid_json_error() {
        let err = ProcessConfig::from_json_str("{not valid json").unwrap_err();
        assert!(matches!(err, DomainError::InvalidJson(_)));
    }

    #[test]
    fn given_array_document_when_parsing_then_not_an_object() {
        let err = ProcessConfig::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, DomainError::NotAnObject { found: "array" }));
    }

    #[test]
    fn given_nested_document_when_get_dotted_key_then_returns_leaf() {
        let config = doc(json!({"registry": {"url": "https://r.example", "tls": true}}));

        assert_eq!(config.get_str("registry.url"), Some("https://r.example"));
        assert_eq!(config.get_bool("registry.tls"), Some(true));
        assert!(config.contains("registry"));
        assert!(!config.contains("registry.missing"));
        assert!(!config.contains("registry.url.deeper"));
        assert_eq!(config.get(""), None);
    }

    #[test]
    fn given_overlay_when_merge_then_objects_merge_and_scalars_replace() {
        let mut config = doc(json!({"registry": {"url": "a", "tls": true}, "name": "x"}));
        let overlay = json!({"registry": {"url": "b"}, "name": {"first": "y"}});

        config.merge(overlay.as_object().unwrap().clone());

        assert_eq!(config.get_str("registry.url"), Some("b"));
        assert_eq!(config.get_bool("registry.tls"), Some(true));
        assert_eq!(config.get_str("name.first"), Some("y"));
        assert_eq!(config.len(), 2);
    }

    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct Registry {
        name: String,
        #[serde(default)]
        org: Option<String>,
    }

    #[test]
    fn given_typed_section_when_get_as_then_deserializes() {
        let config = doc(json!({"registry": {"name": "dockerhub"}, "port": "x"}));

        let registry: Option<Registry> = config.get_as("registry").unwrap();
        let missing: Option<Registry> = config.get_as("other").unwrap();

        assert_eq!(
            registry,
            Some(Registry {
                name: "dockerhub".into(),
                org: None
            })
        );
        assert_eq!(missing, None);
        assert!(config.get_as::<u16>("port").is_err());
    }

    #[test]
    fn given_document_when_deserialize_whole_then_maps_fields() {
        #[derive(Debug, serde::Deserialize)]
        struct Whole {
            registry: Registry,
        }
        let config = doc(json!({"registry": {"name": "quay", "org": "acme"}}));

        let whole: Whole = config.deserialize().unwrap();

        assert_eq!(whole.registry.org.as_deref(), Some("acme"));
    }

    #[test]
    fn given_config_when_pretty_printing_then_round_trips_keys() {
        let config = doc(json!({"a": 1}));
        let rendered = config.to_pretty_json().unwrap();
        assert!(rendered.contains("\"a\": 1"));
    }
}
