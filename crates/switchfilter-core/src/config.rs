//! Configuration management for the SwitchFilter policy module.
//!
//! This module provides a configuration system that supports:
//! - Loading from YAML files
//! - Environment variable overrides
//! - Validation of filter patterns and logging settings

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::Level;

/// Pattern installed when no configuration overrides it: every switch whose
/// identifier begins with `11`.
pub const SEED_PATTERN: &str = "^11.*";

/// Environment variable prefix used by [`AppConfig::from_config_builder`].
pub const ENV_PREFIX: &str = "SWITCHFILTER";

/// Main application configuration.
///
/// # Examples
///
/// ```no_run
/// use switchfilter_core::config::AppConfig;
///
/// let config = AppConfig::from_file("switchfilter.yaml").unwrap();
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Filter rule settings
    #[serde(default)]
    pub filter: FilterSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&contents)
    }

    /// Loads configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            ConfigError::InvalidFormat {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Loads configuration using the `config` crate, layering
    /// `SWITCHFILTER__*` environment variables over the file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or merged.
    pub fn from_config_builder<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("filter.patterns")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        config.try_deserialize().map_err(|e| {
            ConfigError::InvalidFormat {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Validates the configuration.
    ///
    /// Regular-expression syntax is checked when the rule set is built;
    /// this only catches structural mistakes.
    pub fn validate(&self) -> Result<()> {
        self.filter.validate()?;
        self.logging.parse_level()?;
        for (module, level) in &self.logging.module_levels {
            level.parse::<Level>().map_err(|_| {
                ConfigError::invalid_value(
                    format!("logging.module_levels.{}", module),
                    format!("Invalid log level: {}", level),
                )
            })?;
        }
        Ok(())
    }
}

/// Filter rule settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Patterns matched against switch identifiers as whole-string regexes
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,

    /// Whether matching switches get link discovery suppressed on connect
    #[serde(default = "default_true")]
    pub suppress_discovery: bool,
}

fn default_patterns() -> Vec<String> {
    vec![SEED_PATTERN.to_string()]
}

fn default_true() -> bool {
    true
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            suppress_discovery: true,
        }
    }
}

impl FilterSettings {
    /// Validates the filter settings.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for pattern in &self.patterns {
            if pattern.trim().is_empty() {
                return Err(ConfigError::invalid_value(
                    "filter.patterns",
                    "patterns cannot be empty",
                )
                .into());
            }
            if !seen.insert(pattern.as_str()) {
                return Err(ConfigError::validation_failed(format!(
                    "Duplicate filter pattern: {}",
                    pattern
                ))
                .into());
            }
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "text" or "json"
    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Per-module log levels
    #[serde(default)]
    pub module_levels: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Text,
            module_levels: HashMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Parses the log level string to a tracing Level.
    pub fn parse_level(&self) -> Result<Level> {
        self.level.parse().map_err(|_| {
            ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Invalid log level: {}", self.level),
            }
            .into()
        })
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    Text,
    /// JSON format for structured logging
    Json,
}
