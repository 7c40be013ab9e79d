//! Filtering decisions for switches matched by identifier patterns
//!
//! This crate holds the decision engine of the SwitchFilter module:
//!
//! - [`rules`]: whole-string regex rules in a lock-free, read-copy-update set
//! - [`matcher`]: evaluation of a switch identifier against the rule set
//! - [`message`]: the per-message hook that stops PACKET_IN from matching
//!   switches and flags PACKET_OUT towards them
//! - [`discovery`]: suppression of link-discovery probes on matching switches
//! - [`lifecycle`]: routing of switch lifecycle events
//! - [`diagnostics`] and [`metrics`]: injected observability
//!
//! Every decision is a pure function of the current rule set and the
//! switch identifier; nothing is remembered between calls.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use switchfilter_core::types::{
//!     Command, ControlMessage, DatapathId, MessageType, SwitchIdentity,
//! };
//! use switchfilter_engine::{FilterMetrics, FilterRuleSet, MessageFilter, TracingDiagnostics};
//!
//! let filter = MessageFilter::new(
//!     "SwitchFilter",
//!     Arc::new(FilterRuleSet::seeded()),
//!     Arc::new(TracingDiagnostics),
//!     Arc::new(FilterMetrics::new()),
//! );
//!
//! let switch = SwitchIdentity::new(DatapathId::new(0x1122_3344_5566_7788));
//! let msg = ControlMessage::new(MessageType::PacketIn, 1, switch);
//!
//! assert_eq!(filter.on_message(&msg), Command::Stop);
//! ```

pub mod diagnostics;
pub mod discovery;
pub mod lifecycle;
pub mod matcher;
pub mod message;
pub mod metrics;
pub mod rules;

// Re-export commonly used types
pub use diagnostics::{DiagnosticEvent, Diagnostics, RecordingDiagnostics, TracingDiagnostics};
pub use discovery::{
    DiscoverySuppressor, LinkDiscoveryService, SuppressionOutcome, SwitchHandle, SwitchService,
    SwitchSnapshot,
};
pub use lifecycle::{LifecycleListener, SwitchListener};
pub use matcher::{evaluate, matches, MatchResult};
pub use message::{MessageFilter, MessageListener};
pub use metrics::{FilterMetrics, FilterStats};
pub use rules::{FilterRule, FilterRuleSet};
