//! Job configuration: `{seed, window, version}`.
//!
//! The raw document arrives as an untyped key-value tree (the runner parses
//! YAML into it). Validation is done by hand so that every failure carries a
//! message naming the offending key instead of a serde path.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;

use crate::events::EventLog;

/// Version reported on error records when no config could be loaded.
pub const DEFAULT_VERSION: &str = "v1";

/// Keys every config document must define.
pub const REQUIRED_KEYS: [&str; 3] = ["seed", "window", "version"];

/// Validated, read-only run configuration.
///
/// `seed` is provenance metadata only. Nothing in the pipeline is stochastic,
/// so it never feeds a random source. Any integer in `i64::MIN..=u64::MAX`
/// is kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub seed: Number,
    pub window: NonZeroUsize,
    pub version: String,
}

/// Errors from reading or validating the config document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: String },

    #[error("Configuration file could not be read: {0}")]
    Unreadable(String),

    #[error("Invalid configuration file format: {0}")]
    Malformed(String),

    #[error("Configuration file is empty or invalid")]
    Empty,

    #[error("Missing required configuration keys: [{}]", .0.join(", "))]
    MissingKeys(Vec<String>),

    #[error("Configuration key '{key}' must be {expected}, got {found}")]
    WrongType {
        key: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Configuration key 'window' must be a positive integer, got {0}")]
    NonPositiveWindow(i64),

    #[error("Configuration key 'window' is too large: {0}")]
    WindowTooLarge(u64),

    #[error("Configuration key 'version' must be a non-empty string")]
    EmptyVersion,
}

impl Config {
    /// Validate a raw config document and log the accepted values.
    pub fn load(raw: &Value, log: &mut EventLog) -> Result<Self, ConfigError> {
        let config = Self::from_value(raw)?;
        log.info(format!(
            "Config loaded: seed={}, window={}, version={}",
            config.seed, config.window, config.version
        ));
        Ok(config)
    }

    /// Validate without logging.
    pub fn from_value(raw: &Value) -> Result<Self, ConfigError> {
        let map = match raw {
            Value::Object(map) => map,
            _ => return Err(ConfigError::Empty),
        };

        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| !map.contains_key(**key))
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingKeys(missing));
        }

        let seed = match &map["seed"] {
            Value::Number(n) if n.is_i64() || n.is_u64() => n.clone(),
            other => {
                return Err(ConfigError::WrongType {
                    key: "seed",
                    expected: "an integer",
                    found: value_kind(other),
                })
            }
        };

        let window = parse_window(&map["window"])?;

        let version = match &map["version"] {
            Value::String(s) if s.trim().is_empty() => return Err(ConfigError::EmptyVersion),
            Value::String(s) => s.clone(),
            other => {
                return Err(ConfigError::WrongType {
                    key: "version",
                    expected: "a string",
                    found: value_kind(other),
                })
            }
        };

        Ok(Self {
            seed,
            window,
            version,
        })
    }
}

fn parse_window(value: &Value) -> Result<NonZeroUsize, ConfigError> {
    let wrong_type = || ConfigError::WrongType {
        key: "window",
        expected: "a positive integer",
        found: value_kind(value),
    };

    if let Some(n) = value.as_u64() {
        let n_usize = usize::try_from(n).map_err(|_| ConfigError::WindowTooLarge(n))?;
        return NonZeroUsize::new(n_usize).ok_or(ConfigError::NonPositiveWindow(0));
    }
    match value.as_i64() {
        Some(n) => Err(ConfigError::NonPositiveWindow(n)),
        None => Err(wrong_type()),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_f64() => "a float",
        Value::Number(_) => "an integer",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
