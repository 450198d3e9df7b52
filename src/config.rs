use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::matcher::LogSignature;

/// Settings section all keys live under
pub const SECTION: &str = "debugtrace";

pub const DEFAULT_LOG_TYPE: &str = "print";
pub const DEFAULT_MESSAGE_PREFIX: &str = "DebugTrace🔎:";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings: {source}")]
    Parse { source: serde_json::Error },

    #[error("Settings must be a JSON object")]
    NotAnObject,
}

/// Key-value lookup for configuration
pub trait ConfigProvider {
    fn get_string(&self, key: &str) -> Option<String>;
    fn get_bool(&self, key: &str) -> Option<bool>;
}

/// Configuration captured once at the start of a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    /// Name of the function the log statement calls
    pub log_type: String,
    /// Marker put at the start of every message
    pub log_message_prefix: String,
    /// Whether messages carry `[file:line]`
    pub include_file_info: bool,
    /// Whether a `// ----` line follows each inserted statement
    pub add_separator_line: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_type: DEFAULT_LOG_TYPE.to_string(),
            log_message_prefix: DEFAULT_MESSAGE_PREFIX.to_string(),
            include_file_info: true,
            add_separator_line: false,
        }
    }
}

impl LogConfig {
    /// Read every key from `provider`, using defaults for missing or empty values
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| provider.get_string(key).filter(|value| !value.is_empty());

        Self {
            log_type: non_empty("logType").unwrap_or(defaults.log_type),
            log_message_prefix: non_empty("logMessagePrefix").unwrap_or(defaults.log_message_prefix),
            include_file_info: provider
                .get_bool("includeFileInfo")
                .unwrap_or(defaults.include_file_info),
            add_separator_line: provider
                .get_bool("addSeparatorLine")
                .unwrap_or(defaults.add_separator_line),
        }
    }

    /// The signature used to recognise statements this config produces
    pub fn signature(&self) -> LogSignature {
        LogSignature::new(&self.log_type, &self.log_message_prefix)
    }
}

/// Settings held in a VS Code style JSON object
///
/// Keys may be flat (`"debugtrace.logType"`) or nested under a
/// `"debugtrace"` object. Flat keys win when both are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonSettings {
    values: Map<String, Value>,
}

impl JsonSettings {
    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(json).map_err(|source| ConfigError::Parse { source })?;
        match value {
            Value::Object(values) => Ok(Self { values }),
            _ => Err(ConfigError::NotAnObject),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Set a key inside the section
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.values.insert(format!("{}.{}", SECTION, key), value.into());
        self
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        self.values
            .get(&format!("{}.{}", SECTION, key))
            .or_else(|| self.values.get(SECTION)?.get(key))
    }
}

impl ConfigProvider for JsonSettings {
    fn get_string(&self, key: &str) -> Option<String> {
        self.lookup(key)?.as_str().map(str::to_string)
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.lookup(key)?.as_bool()
    }
}

/// Providers consulted in order; the first one holding a key wins
pub struct LayeredConfig<'a> {
    layers: Vec<&'a dyn ConfigProvider>,
}

impl<'a> LayeredConfig<'a> {
    pub fn new(layers: Vec<&'a dyn ConfigProvider>) -> Self {
        Self { layers }
    }
}

impl ConfigProvider for LayeredConfig<'_> {
    fn get_string(&self, key: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.get_string(key))
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.layers.iter().find_map(|layer| layer.get_bool(key))
    }
}
