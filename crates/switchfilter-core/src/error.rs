//! Error types for the SwitchFilter policy module.
//!
//! None of these errors ever travel through the message-filtering hook: that
//! hook only answers `Continue` or `Stop`. They surface at configuration time
//! (rule registration, config loading) and during module lifecycle calls.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using SwitchFilterError as the error type.
pub type Result<T> = std::result::Result<T, SwitchFilterError>;

/// Top-level error type for all SwitchFilter operations.
#[derive(Debug, Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum SwitchFilterError {
    /// Filter rule registration errors
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Parsing errors for identifiers and wire names
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Module lifecycle errors
    #[error("Module error: {0}")]
    Module(#[from] ModuleError),

    /// Internal errors that shouldn't normally occur
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised when a pattern is added to a rule set.
///
/// Malformed patterns are rejected here so that match evaluation never has
/// to deal with them.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RuleError {
    /// The pattern text was empty or whitespace only
    #[error("Filter pattern is empty")]
    EmptyPattern,

    /// The pattern is not a valid regular expression
    #[error("Invalid filter pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl RuleError {
    /// Creates an invalid pattern error.
    pub fn invalid(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}

/// Errors related to parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ParseError {
    /// Datapath identifier is neither colon-separated nor plain hex
    #[error("Invalid datapath id '{value}': {reason}")]
    InvalidDatapathId { value: String, reason: String },
}

impl ParseError {
    /// Creates an invalid datapath id error.
    pub fn invalid_dpid(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDatapathId {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Errors related to configuration.
///
/// These errors occur when loading, parsing, or validating configuration files.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {reason}")]
    InvalidFormat { reason: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// Configuration validation failed
    #[error("Configuration validation failed: {reason}")]
    ValidationFailed { reason: String },
}

impl ConfigError {
    /// Creates an invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a validation failed error.
    pub fn validation_failed(reason: impl Into<String>) -> Self {
        Self::ValidationFailed {
            reason: reason.into(),
        }
    }
}

/// Errors raised by the host-facing module lifecycle.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ModuleError {
    /// `start_up` was called more than once
    #[error("Module {module} is already started")]
    AlreadyStarted { module: String },

    /// A required service was not provided by the host
    #[error("Module {module} requires service {service}")]
    MissingService { module: String, service: String },
}
