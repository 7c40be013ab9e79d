//! End-to-end behavior of the module wired into a controller

mod common;

use common::{message, MockController, MockDiscovery, MATCHING_DPID, OTHER_DPID};
use std::io::Write;
use std::sync::Arc;
use switchfilter::{
    AppConfig, DiagnosticEvent, FilterSettings, LinkDiscoveryService, RecordingDiagnostics,
    SwitchFilterModule,
};
use switchfilter_core::error::{ModuleError, RuleError, SwitchFilterError};
use switchfilter_core::types::{
    Command, DatapathId, MessageType, PortChangeType, SwitchPort,
};

struct Harness {
    controller: Arc<MockController>,
    discovery: Arc<MockDiscovery>,
    diagnostics: Arc<RecordingDiagnostics>,
    module: SwitchFilterModule,
}

fn started(settings: FilterSettings) -> Harness {
    let controller = MockController::new();
    let discovery = MockDiscovery::new();
    let diagnostics = Arc::new(RecordingDiagnostics::new());

    let module = SwitchFilterModule::init(
        &settings,
        controller.clone(),
        Some(discovery.clone() as Arc<dyn LinkDiscoveryService>),
        diagnostics.clone(),
    )
    .expect("Failed to init module");
    module
        .start_up(controller.as_ref())
        .expect("Failed to start module");

    Harness {
        controller,
        discovery,
        diagnostics,
        module,
    }
}

#[test]
fn test_module_identity() {
    let harness = started(FilterSettings::default());

    assert_eq!(harness.module.name(), "SwitchFilter");
    assert_eq!(
        SwitchFilterModule::module_dependencies(),
        &["ControllerService", "LinkDiscoveryService"]
    );
    assert_eq!(harness.module.rules().patterns(), vec!["^11.*".to_string()]);
}

#[test]
fn test_start_up_registers_listeners_once() {
    let harness = started(FilterSettings::default());

    assert!(harness.module.is_started());
    assert_eq!(
        harness.controller.registered_kinds(),
        vec![MessageType::PacketIn, MessageType::PacketOut]
    );
    assert_eq!(harness.controller.switch_listeners().len(), 1);

    let err = harness
        .module
        .start_up(harness.controller.as_ref())
        .unwrap_err();
    assert!(matches!(
        err,
        SwitchFilterError::Module(ModuleError::AlreadyStarted { .. })
    ));
    assert_eq!(harness.controller.registered_kinds().len(), 2);
}

#[test]
fn test_packet_in_dispatch() {
    let harness = started(FilterSettings::default());

    let stopped = harness
        .controller
        .dispatch(&message(MessageType::PacketIn, MATCHING_DPID, 1));
    assert_eq!(stopped, Command::Stop);

    let passed = harness
        .controller
        .dispatch(&message(MessageType::PacketIn, OTHER_DPID, 2));
    assert_eq!(passed, Command::Continue);

    let events = harness.diagnostics.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        DiagnosticEvent::PacketInSuppressed { xid: 1, pattern, .. } if pattern == "^11.*"
    ));
}

#[test]
fn test_packet_out_is_flagged() {
    let harness = started(FilterSettings::default());

    let command = harness
        .controller
        .dispatch(&message(MessageType::PacketOut, MATCHING_DPID, 9));

    // Stop is advisory for PACKET_OUT; the warning is the observable effect.
    assert_eq!(command, Command::Stop);
    assert_eq!(harness.diagnostics.count_at(tracing::Level::WARN), 1);
    assert_eq!(harness.module.stats().packet_out_observed, 1);
}

#[test]
fn test_unregistered_kinds_are_not_seen() {
    let harness = started(FilterSettings::default());

    let command = harness
        .controller
        .dispatch(&message(MessageType::FlowMod, MATCHING_DPID, 3));

    assert_eq!(command, Command::Continue);
    assert!(harness.diagnostics.is_empty());
    assert_eq!(harness.module.stats().evaluated, 0);
}

#[test]
fn test_switch_added_suppresses_enabled_ports() {
    let harness = started(FilterSettings::default());
    harness.controller.connect(MATCHING_DPID, &[1, 2, 5]);
    harness.controller.connect(OTHER_DPID, &[1, 2, 3, 4]);

    harness.controller.announce_added(MATCHING_DPID);
    harness.controller.announce_added(OTHER_DPID);

    let dpid = DatapathId::new(MATCHING_DPID);
    assert_eq!(
        harness.discovery.directives(),
        vec![(dpid, 1), (dpid, 2), (dpid, 5)]
    );
    assert_eq!(harness.module.stats().discovery_directives, 3);
    assert_eq!(harness.module.stats().switches_matched, 1);
}

#[test]
fn test_ports_enabled_later_are_not_suppressed() {
    let harness = started(FilterSettings::default());
    harness.controller.connect(MATCHING_DPID, &[1]);
    harness.controller.announce_added(MATCHING_DPID);

    // The switch gains a port after it was added.
    harness.controller.connect(MATCHING_DPID, &[1, 2]);
    let port = SwitchPort::new(2, "eth2");
    for listener in harness.controller.switch_listeners() {
        listener.switch_port_changed(DatapathId::new(MATCHING_DPID), &port, PortChangeType::Add);
    }

    assert_eq!(harness.discovery.directives().len(), 1);
}

#[test]
fn test_non_added_events_never_suppress() {
    let harness = started(FilterSettings::default());
    harness.controller.connect(MATCHING_DPID, &[1, 2, 5]);
    let dpid = DatapathId::new(MATCHING_DPID);

    for listener in harness.controller.switch_listeners() {
        listener.switch_removed(dpid);
        listener.switch_activated(dpid);
        listener.switch_port_changed(dpid, &SwitchPort::new(1, "eth1"), PortChangeType::Down);
        listener.switch_changed(dpid);
    }

    assert!(harness.discovery.directives().is_empty());
    assert!(harness.diagnostics.is_empty());
}

#[test]
fn test_unknown_switch_does_not_disturb_others() {
    let harness = started(FilterSettings::default());
    harness.controller.connect(MATCHING_DPID, &[7]);

    harness.controller.announce_added(0x1100_0000_0000_00ff);
    harness.controller.announce_added(MATCHING_DPID);

    assert_eq!(
        harness.discovery.directives(),
        vec![(DatapathId::new(MATCHING_DPID), 7)]
    );
    assert!(harness
        .diagnostics
        .events()
        .iter()
        .any(|event| matches!(event, DiagnosticEvent::SwitchUnresolved { .. })));
}

#[test]
fn test_discovery_suppression_can_be_disabled() {
    let harness = started(FilterSettings {
        suppress_discovery: false,
        ..FilterSettings::default()
    });
    harness.controller.connect(MATCHING_DPID, &[1, 2, 5]);

    harness.controller.announce_added(MATCHING_DPID);

    assert!(harness.discovery.directives().is_empty());
    // Packet filtering is unaffected.
    assert_eq!(
        harness
            .controller
            .dispatch(&message(MessageType::PacketIn, MATCHING_DPID, 1)),
        Command::Stop
    );
}

#[test]
fn test_absent_discovery_service() {
    let controller = MockController::new();
    let diagnostics = Arc::new(RecordingDiagnostics::new());
    let module = SwitchFilterModule::init(
        &FilterSettings::default(),
        controller.clone(),
        None,
        diagnostics,
    )
    .unwrap();
    module.start_up(controller.as_ref()).unwrap();
    controller.connect(MATCHING_DPID, &[1, 2, 5]);

    controller.announce_added(MATCHING_DPID);

    assert_eq!(module.stats().discovery_directives, 0);
}

#[test]
fn test_add_filter_pattern() {
    let harness = started(FilterSettings::default());
    let msg = message(MessageType::PacketIn, OTHER_DPID, 4);
    assert_eq!(harness.controller.dispatch(&msg), Command::Continue);

    assert!(harness.module.add_filter_pattern("^22:11:.*").unwrap());
    assert!(!harness.module.add_filter_pattern("^22:11:.*").unwrap());
    assert_eq!(harness.controller.dispatch(&msg), Command::Stop);

    let err = harness.module.add_filter_pattern("^22:(").unwrap_err();
    assert!(matches!(
        err,
        SwitchFilterError::Rule(RuleError::InvalidPattern { .. })
    ));
    assert_eq!(harness.module.rules().len(), 2);
}

#[test]
fn test_init_rejects_malformed_configured_pattern() {
    let settings = FilterSettings {
        patterns: vec!["^11.*".to_string(), "[".to_string()],
        suppress_discovery: true,
    };

    let result = SwitchFilterModule::init(
        &settings,
        MockController::new(),
        None,
        Arc::new(RecordingDiagnostics::new()),
    );
    assert!(matches!(result, Err(SwitchFilterError::Rule(_))));
}

#[test]
fn test_init_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
filter:
  patterns:
    - "^22:.*"
  suppress_discovery: true
logging:
  level: debug
"#
    )
    .unwrap();

    let config = AppConfig::from_file(file.path()).unwrap();
    config.validate().unwrap();
    let harness = started(config.filter);

    assert_eq!(
        harness
            .controller
            .dispatch(&message(MessageType::PacketIn, OTHER_DPID, 1)),
        Command::Stop
    );
    assert_eq!(
        harness
            .controller
            .dispatch(&message(MessageType::PacketIn, MATCHING_DPID, 2)),
        Command::Continue
    );
}
