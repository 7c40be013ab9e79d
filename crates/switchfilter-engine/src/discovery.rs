//! Link-discovery suppression for matching switches
//!
//! When a switch connects, [`DiscoverySuppressor`] asks the controller for the
//! switch's enabled ports and, if the switch matches a rule, tells the
//! discovery service to stop probing each of them.
//!
//! The port list is read once, when the switch is added. Ports enabled later
//! keep being probed.

use crate::diagnostics::{DiagnosticEvent, Diagnostics};
use crate::matcher::{self, MatchResult};
use crate::metrics::FilterMetrics;
use crate::rules::FilterRuleSet;
use std::sync::Arc;
use switchfilter_core::types::{DatapathId, PortNumber, SwitchIdentity};
use tracing::trace;

/// A connected switch as seen by the controller
pub trait SwitchHandle: Send + Sync {
    /// Identity of the switch
    fn identity(&self) -> &SwitchIdentity;

    /// Ports currently enabled
    fn enabled_port_numbers(&self) -> Vec<PortNumber>;
}

/// Controller lookup of connected switches
pub trait SwitchService: Send + Sync {
    /// Resolve a switch by datapath id
    fn get_switch(&self, dpid: DatapathId) -> Option<Arc<dyn SwitchHandle>>;
}

/// Topology discovery service that sends LLDP probes
pub trait LinkDiscoveryService: Send + Sync {
    /// Stop sending discovery probes on one port. Fire-and-forget.
    fn suppress_discovery(&self, dpid: DatapathId, port: PortNumber);
}

/// Plain snapshot of a switch, for hosts that don't keep richer handles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchSnapshot {
    identity: SwitchIdentity,
    enabled_ports: Vec<PortNumber>,
}

impl SwitchSnapshot {
    pub fn new(identity: SwitchIdentity, enabled_ports: Vec<PortNumber>) -> Self {
        Self {
            identity,
            enabled_ports,
        }
    }
}

impl SwitchHandle for SwitchSnapshot {
    fn identity(&self) -> &SwitchIdentity {
        &self.identity
    }

    fn enabled_port_numbers(&self) -> Vec<PortNumber> {
        self.enabled_ports.clone()
    }
}

/// What a switch-added event led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressionOutcome {
    /// The controller did not know the switch; event dropped
    Unresolved,
    /// No discovery service configured; nothing to do
    DiscoveryUnavailable,
    /// Switch matched no rule
    NotMatched,
    /// One directive sent per enabled port
    Suppressed { ports: usize },
}

impl SuppressionOutcome {
    /// Number of directives issued
    pub fn directives(&self) -> usize {
        match self {
            SuppressionOutcome::Suppressed { ports } => *ports,
            _ => 0,
        }
    }
}

/// Issues discovery suppression directives for matching switches
pub struct DiscoverySuppressor {
    rules: Arc<FilterRuleSet>,
    switches: Arc<dyn SwitchService>,
    discovery: Option<Arc<dyn LinkDiscoveryService>>,
    diagnostics: Arc<dyn Diagnostics>,
    metrics: Arc<FilterMetrics>,
}

impl DiscoverySuppressor {
    pub fn new(
        rules: Arc<FilterRuleSet>,
        switches: Arc<dyn SwitchService>,
        discovery: Option<Arc<dyn LinkDiscoveryService>>,
        diagnostics: Arc<dyn Diagnostics>,
        metrics: Arc<FilterMetrics>,
    ) -> Self {
        Self {
            rules,
            switches,
            discovery,
            diagnostics,
            metrics,
        }
    }

    /// Whether a discovery service is wired in
    pub fn has_discovery(&self) -> bool {
        self.discovery.is_some()
    }

    /// Handle a switch-added event.
    ///
    /// Calling this twice for the same switch sends the directives twice,
    /// which the discovery service treats as a no-op.
    pub fn on_switch_added(&self, dpid: DatapathId) -> SuppressionOutcome {
        let Some(switch) = self.switches.get_switch(dpid) else {
            self.diagnostics
                .record(DiagnosticEvent::SwitchUnresolved { dpid });
            return SuppressionOutcome::Unresolved;
        };

        let identity = switch.identity().clone();
        self.diagnostics.record(DiagnosticEvent::SwitchAdded {
            switch: identity.clone(),
        });

        let Some(discovery) = &self.discovery else {
            trace!(switch = %identity, "No discovery service, skipping LLDP suppression");
            return SuppressionOutcome::DiscoveryUnavailable;
        };

        let rule = match matcher::evaluate(identity.string_id(), &self.rules) {
            MatchResult::Match(rule) => rule,
            MatchResult::NoMatch => return SuppressionOutcome::NotMatched,
        };

        let ports = switch.enabled_port_numbers();
        self.metrics.record_switch_matched();
        self.diagnostics.record(DiagnosticEvent::DiscoverySuppressed {
            switch: identity,
            pattern: rule.pattern().to_string(),
            ports: ports.len(),
        });

        for port in &ports {
            discovery.suppress_discovery(dpid, *port);
        }
        self.metrics.record_discovery_directives(ports.len() as u64);

        SuppressionOutcome::Suppressed { ports: ports.len() }
    }
}
