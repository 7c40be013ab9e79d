//! Diagnostics capability injected into the filter components
//!
//! Components never log through a global; they hand a [`DiagnosticEvent`] to
//! whatever [`Diagnostics`] sink the host passed in. [`TracingDiagnostics`]
//! forwards to `tracing`, [`RecordingDiagnostics`] keeps events in memory.

use parking_lot::Mutex;
use std::fmt;
use switchfilter_core::types::{DatapathId, MessageType, SwitchIdentity};
use tracing::{debug, info, warn, Level};

/// Observation emitted by the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// A switch connected and was resolved by the controller
    SwitchAdded { switch: SwitchIdentity },
    /// Discovery probes were suppressed on a matching switch
    DiscoverySuppressed {
        switch: SwitchIdentity,
        pattern: String,
        ports: usize,
    },
    /// A PACKET_IN from a matching switch was dropped
    PacketInSuppressed {
        switch: SwitchIdentity,
        xid: u32,
        pattern: String,
    },
    /// A PACKET_OUT towards a matching switch was seen. The host does not
    /// honor `Stop` for this kind, so the message may still be delivered.
    PacketOutObserved {
        switch: SwitchIdentity,
        xid: u32,
        pattern: String,
    },
    /// A switch-added event named a switch the controller does not know
    SwitchUnresolved { dpid: DatapathId },
}

impl DiagnosticEvent {
    /// Severity at which the event is reported
    pub fn level(&self) -> Level {
        match self {
            DiagnosticEvent::PacketInSuppressed { .. } => Level::DEBUG,
            DiagnosticEvent::SwitchAdded { .. } | DiagnosticEvent::DiscoverySuppressed { .. } => {
                Level::INFO
            }
            DiagnosticEvent::PacketOutObserved { .. } | DiagnosticEvent::SwitchUnresolved { .. } => {
                Level::WARN
            }
        }
    }

    /// Message kind the event refers to, if it concerns a message
    pub fn message_type(&self) -> Option<MessageType> {
        match self {
            DiagnosticEvent::PacketInSuppressed { .. } => Some(MessageType::PacketIn),
            DiagnosticEvent::PacketOutObserved { .. } => Some(MessageType::PacketOut),
            _ => None,
        }
    }
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticEvent::SwitchAdded { switch } => write!(f, "switch {} added", switch),
            DiagnosticEvent::DiscoverySuppressed {
                switch,
                pattern,
                ports,
            } => write!(
                f,
                "discovery suppressed on {} port(s) of switch {} (rule {})",
                ports, switch, pattern
            ),
            DiagnosticEvent::PacketInSuppressed {
                switch,
                xid,
                pattern,
            } => write!(
                f,
                "packet-in from switch {} (xid {}) discarded (rule {})",
                switch, xid, pattern
            ),
            DiagnosticEvent::PacketOutObserved {
                switch,
                xid,
                pattern,
            } => write!(
                f,
                "packet-out to switch {} (xid {}) matched rule {} but cannot be blocked here",
                switch, xid, pattern
            ),
            DiagnosticEvent::SwitchUnresolved { dpid } => {
                write!(f, "switch {} added but not known to the controller", dpid)
            }
        }
    }
}

/// Sink for diagnostic events. Must not block.
pub trait Diagnostics: Send + Sync {
    /// Record one event
    fn record(&self, event: DiagnosticEvent);
}

/// Forwards events to `tracing` at their own severity
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn record(&self, event: DiagnosticEvent) {
        match &event {
            DiagnosticEvent::SwitchAdded { switch } => {
                info!(switch = %switch, "Switch added");
            }
            DiagnosticEvent::DiscoverySuppressed {
                switch,
                pattern,
                ports,
            } => {
                info!(switch = %switch, pattern = %pattern, ports, "Disabling LLDP for switch");
            }
            DiagnosticEvent::PacketInSuppressed {
                switch,
                xid,
                pattern,
            } => {
                debug!(switch = %switch, xid, pattern = %pattern, "Packet in from switch, discarding it");
            }
            DiagnosticEvent::PacketOutObserved {
                switch,
                xid,
                pattern,
            } => {
                warn!(
                    switch = %switch,
                    xid,
                    pattern = %pattern,
                    "Packet out to filtered switch cannot be blocked at this point"
                );
            }
            DiagnosticEvent::SwitchUnresolved { dpid } => {
                warn!(dpid = %dpid, "Switch added but not found in controller, event dropped");
            }
        }
    }
}

/// Keeps every event in memory, in arrival order
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl RecordingDiagnostics {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all events recorded so far
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().clone()
    }

    /// Number of recorded events at the given severity
    pub fn count_at(&self, level: Level) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| event.level() == level)
            .count()
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Check if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Drop all recorded events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn record(&self, event: DiagnosticEvent) {
        self.events.lock().push(event);
    }
}
