//! Switch lifecycle routing
//!
//! Only switch-added events do anything: they are handed to the
//! [`DiscoverySuppressor`]. Removed, activated, port-changed and changed
//! events are accepted and discarded. The listener holds no per-switch state.

use crate::discovery::{DiscoverySuppressor, SuppressionOutcome};
use std::sync::Arc;
use switchfilter_core::types::{DatapathId, PortChangeType, SwitchPort};
use tracing::trace;

/// Host-facing contract for switch lifecycle notifications
pub trait SwitchListener: Send + Sync {
    fn switch_added(&self, dpid: DatapathId);

    fn switch_removed(&self, dpid: DatapathId);

    fn switch_activated(&self, dpid: DatapathId);

    fn switch_port_changed(&self, dpid: DatapathId, port: &SwitchPort, change: PortChangeType);

    fn switch_changed(&self, dpid: DatapathId);
}

/// Routes switch-added events to discovery suppression
pub struct LifecycleListener {
    suppressor: Arc<DiscoverySuppressor>,
}

impl LifecycleListener {
    pub fn new(suppressor: Arc<DiscoverySuppressor>) -> Self {
        Self { suppressor }
    }

    /// Handle switch-added and report what happened
    pub fn on_switch_added(&self, dpid: DatapathId) -> SuppressionOutcome {
        self.suppressor.on_switch_added(dpid)
    }
}

impl SwitchListener for LifecycleListener {
    fn switch_added(&self, dpid: DatapathId) {
        let outcome = self.on_switch_added(dpid);
        trace!(dpid = %dpid, ?outcome, "Switch added handled");
    }

    fn switch_removed(&self, _dpid: DatapathId) {}

    fn switch_activated(&self, _dpid: DatapathId) {}

    fn switch_port_changed(&self, _dpid: DatapathId, _port: &SwitchPort, _change: PortChangeType) {}

    fn switch_changed(&self, _dpid: DatapathId) {}
}
