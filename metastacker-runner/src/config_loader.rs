//! YAML config reading.
//!
//! Parses the config file into an untyped value. Key validation belongs to
//! `metastacker_core::Config::load`.

use std::path::Path;

use metastacker_core::ConfigError;
use serde_json::Value;

/// Read a YAML config document from disk.
///
/// A blank file yields `Value::Null`, which the validation gate reports as an
/// empty config.
pub fn read_config(path: &Path) -> Result<Value, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.display().to_string(),
        });
    }
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable(e.to_string()))?;
    parse_config(&content)
}

/// Parse YAML text into an untyped value.
pub fn parse_config(content: &str) -> Result<Value, ConfigError> {
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(content).map_err(|e| ConfigError::Malformed(e.to_string()))
}
