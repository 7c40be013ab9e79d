//! Per-message filtering hook
//!
//! [`MessageFilter`] decides, for every PACKET_IN and PACKET_OUT the host
//! dispatches, whether the message continues down the controller pipeline.
//!
//! # PACKET_OUT is advisory
//!
//! The host dispatch point this filter sits at does not consult the returned
//! command for outbound messages. A matching PACKET_OUT is answered with
//! `Stop` and a warning is recorded, but the message may still reach the
//! switch. Blocking it needs cooperation from the module that emits it.

use crate::diagnostics::{DiagnosticEvent, Diagnostics};
use crate::matcher::{self, MatchResult};
use crate::metrics::FilterMetrics;
use crate::rules::FilterRuleSet;
use std::sync::Arc;
use switchfilter_core::types::{Command, ControlMessage, MessageType};
use tracing::trace;

/// Host-facing contract for anything that receives dispatched messages
pub trait MessageListener: Send + Sync {
    /// Listener name, used by the host for callback ordering
    fn name(&self) -> &str;

    /// Whether `other` must run before this listener for `kind`
    fn is_callback_ordering_prereq(&self, _kind: MessageType, _other: &str) -> bool {
        false
    }

    /// Whether `other` must run after this listener for `kind`
    fn is_callback_ordering_postreq(&self, _kind: MessageType, _other: &str) -> bool {
        false
    }

    /// Handle one message
    fn receive(&self, msg: &ControlMessage) -> Command;
}

/// Stops PACKET_IN (and flags PACKET_OUT) traffic of matching switches
pub struct MessageFilter {
    name: String,
    rules: Arc<FilterRuleSet>,
    diagnostics: Arc<dyn Diagnostics>,
    metrics: Arc<FilterMetrics>,
}

impl MessageFilter {
    /// Create a message filter over a shared rule set
    pub fn new(
        name: impl Into<String>,
        rules: Arc<FilterRuleSet>,
        diagnostics: Arc<dyn Diagnostics>,
        metrics: Arc<FilterMetrics>,
    ) -> Self {
        Self {
            name: name.into(),
            rules,
            diagnostics,
            metrics,
        }
    }

    /// Message kinds this filter inspects; everything else passes untouched
    pub const FILTERED_TYPES: [MessageType; 2] = [MessageType::PacketIn, MessageType::PacketOut];

    /// Decide the fate of one message
    pub fn on_message(&self, msg: &ControlMessage) -> Command {
        // `Other(10)` and `PacketIn` are the same message on the wire.
        let kind = msg.kind.canonical();
        if !Self::FILTERED_TYPES.contains(&kind) {
            return Command::Continue;
        }

        self.metrics.record_evaluated();
        let rule = match matcher::evaluate(msg.switch.string_id(), &self.rules) {
            MatchResult::Match(rule) => rule,
            MatchResult::NoMatch => {
                self.metrics.record_passed();
                trace!(msg = %msg, "No filter rule matched");
                return Command::Continue;
            }
        };

        let pattern = rule.pattern().to_string();
        match kind {
            MessageType::PacketIn => {
                self.metrics.record_packet_in_suppressed();
                self.diagnostics.record(DiagnosticEvent::PacketInSuppressed {
                    switch: msg.switch.clone(),
                    xid: msg.xid,
                    pattern,
                });
            }
            MessageType::PacketOut => {
                self.metrics.record_packet_out_observed();
                self.diagnostics.record(DiagnosticEvent::PacketOutObserved {
                    switch: msg.switch.clone(),
                    xid: msg.xid,
                    pattern,
                });
            }
            _ => {}
        }

        Command::Stop
    }

    /// Shared rule set
    pub fn rules(&self) -> &Arc<FilterRuleSet> {
        &self.rules
    }
}

impl MessageListener for MessageFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn receive(&self, msg: &ControlMessage) -> Command {
        self.on_message(msg)
    }
}
