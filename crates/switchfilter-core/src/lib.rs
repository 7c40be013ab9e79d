//! # SwitchFilter Core
//!
//! Core types, error handling, and configuration for the SwitchFilter
//! control-plane policy module.
//!
//! This crate provides the foundational building blocks shared by the engine
//! and the host-facing module:
//!
//! - **Types**: `DatapathId`, `SwitchIdentity`, `MessageType`, `ControlMessage`,
//!   `Command`, and the port descriptors handed over by lifecycle events.
//! - **Errors**: error types using `thiserror` for rule registration, parsing,
//!   configuration, and module lifecycle failures.
//! - **Configuration**: YAML configuration with environment variable overrides
//!   and validation.
//!
//! ## Example
//!
//! ```
//! use switchfilter_core::types::{DatapathId, SwitchIdentity};
//!
//! let dpid: DatapathId = "11:22:33:44:55:66:77:88".parse().unwrap();
//! let identity = SwitchIdentity::new(dpid);
//!
//! assert_eq!(identity.string_id(), "11:22:33:44:55:66:77:88");
//! ```

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types for convenience
pub use config::{AppConfig, FilterSettings, LoggingConfig};
pub use error::{Result, SwitchFilterError};
pub use types::{
    Command, ControlMessage, DatapathId, MessageType, PortChangeType, PortNumber, SwitchIdentity,
    SwitchPort,
};
