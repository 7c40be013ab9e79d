//! Common test utilities: an in-memory controller and discovery service

#![allow(dead_code)]

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use switchfilter::{
    ControllerService, LinkDiscoveryService, MessageListener, SwitchHandle, SwitchListener,
    SwitchService, SwitchSnapshot,
};
use switchfilter_core::types::{
    Command, ControlMessage, DatapathId, MessageType, PortNumber, SwitchIdentity,
};

/// Identifier matching the seed pattern
pub const MATCHING_DPID: u64 = 0x1122_3344_5566_7788;

/// Identifier that does not match the seed pattern
pub const OTHER_DPID: u64 = 0x2211_3344_5566_7788;

/// Controller that keeps switches and registered listeners in memory and
/// dispatches like the real one: listeners in registration order, first
/// `Stop` wins.
#[derive(Default)]
pub struct MockController {
    switches: DashMap<DatapathId, Arc<SwitchSnapshot>>,
    message_listeners: Mutex<Vec<(MessageType, Arc<dyn MessageListener>)>>,
    switch_listeners: Mutex<Vec<Arc<dyn SwitchListener>>>,
}

impl MockController {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn connect(&self, raw: u64, ports: &[PortNumber]) {
        let dpid = DatapathId::new(raw);
        self.switches.insert(
            dpid,
            Arc::new(SwitchSnapshot::new(SwitchIdentity::new(dpid), ports.to_vec())),
        );
    }

    pub fn dispatch(&self, msg: &ControlMessage) -> Command {
        let listeners: Vec<_> = self
            .message_listeners
            .lock()
            .iter()
            .filter(|(kind, _)| *kind == msg.kind)
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            if listener.receive(msg).is_stop() {
                return Command::Stop;
            }
        }
        Command::Continue
    }

    pub fn announce_added(&self, raw: u64) {
        let listeners = self.switch_listeners.lock().clone();
        for listener in listeners {
            listener.switch_added(DatapathId::new(raw));
        }
    }

    pub fn switch_listeners(&self) -> Vec<Arc<dyn SwitchListener>> {
        self.switch_listeners.lock().clone()
    }

    pub fn registered_kinds(&self) -> Vec<MessageType> {
        self.message_listeners
            .lock()
            .iter()
            .map(|(kind, _)| *kind)
            .collect()
    }
}

impl SwitchService for MockController {
    fn get_switch(&self, dpid: DatapathId) -> Option<Arc<dyn SwitchHandle>> {
        self.switches
            .get(&dpid)
            .map(|entry| entry.value().clone() as Arc<dyn SwitchHandle>)
    }
}

impl ControllerService for MockController {
    fn add_message_listener(&self, kind: MessageType, listener: Arc<dyn MessageListener>) {
        self.message_listeners.lock().push((kind, listener));
    }

    fn add_switch_listener(&self, listener: Arc<dyn SwitchListener>) {
        self.switch_listeners.lock().push(listener);
    }
}

/// Discovery service recording every directive
#[derive(Default)]
pub struct MockDiscovery {
    directives: Mutex<Vec<(DatapathId, PortNumber)>>,
}

impl MockDiscovery {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn directives(&self) -> Vec<(DatapathId, PortNumber)> {
        self.directives.lock().clone()
    }
}

impl LinkDiscoveryService for MockDiscovery {
    fn suppress_discovery(&self, dpid: DatapathId, port: PortNumber) {
        self.directives.lock().push((dpid, port));
    }
}

/// Build a control message for a switch
pub fn message(kind: MessageType, raw: u64, xid: u32) -> ControlMessage {
    ControlMessage::new(kind, xid, SwitchIdentity::new(DatapathId::new(raw)))
}
