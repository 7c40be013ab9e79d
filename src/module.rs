//! Host-facing SwitchFilter module
//!
//! Wires the rule set, the message filter and the lifecycle listener
//! together and registers them with the controller. The two listeners are
//! separate objects; the host sees one message listener for PACKET_IN and
//! PACKET_OUT and one switch listener.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use switchfilter_core::config::FilterSettings;
use switchfilter_core::error::{ModuleError, Result};
use switchfilter_core::types::MessageType;
use switchfilter_engine::{
    Diagnostics, DiscoverySuppressor, FilterMetrics, FilterRuleSet, FilterStats, LifecycleListener,
    LinkDiscoveryService, MessageFilter, MessageListener, SwitchListener, SwitchService,
};
use tracing::info;

/// Name under which the controller service is declared as a dependency
pub const CONTROLLER_SERVICE: &str = "ControllerService";

/// Name under which the link-discovery service is declared as a dependency
pub const LINK_DISCOVERY_SERVICE: &str = "LinkDiscoveryService";

/// The controller as this module uses it: switch lookup plus listener
/// registration.
pub trait ControllerService: SwitchService {
    /// Register a listener for one message kind
    fn add_message_listener(&self, kind: MessageType, listener: Arc<dyn MessageListener>);

    /// Register a switch lifecycle listener
    fn add_switch_listener(&self, listener: Arc<dyn SwitchListener>);
}

/// The SwitchFilter module
pub struct SwitchFilterModule {
    rules: Arc<FilterRuleSet>,
    message_filter: Arc<MessageFilter>,
    lifecycle: Arc<LifecycleListener>,
    metrics: Arc<FilterMetrics>,
    started: AtomicBool,
}

impl SwitchFilterModule {
    /// Module name reported to the host
    pub const NAME: &'static str = "SwitchFilter";

    /// Services the host must provide before `init`
    pub fn module_dependencies() -> &'static [&'static str] {
        &[CONTROLLER_SERVICE, LINK_DISCOVERY_SERVICE]
    }

    /// Build the module.
    ///
    /// When `settings.suppress_discovery` is off, `discovery` is ignored and
    /// switch-added events never issue directives.
    pub fn init<C>(
        settings: &FilterSettings,
        controller: Arc<C>,
        discovery: Option<Arc<dyn LinkDiscoveryService>>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Result<Self>
    where
        C: ControllerService + 'static,
    {
        settings.validate()?;
        let rules = Arc::new(FilterRuleSet::from_patterns(&settings.patterns)?);
        let metrics = Arc::new(FilterMetrics::new());

        let discovery = discovery.filter(|_| settings.suppress_discovery);
        let suppressor = DiscoverySuppressor::new(
            rules.clone(),
            controller as Arc<dyn SwitchService>,
            discovery,
            diagnostics.clone(),
            metrics.clone(),
        );

        let message_filter = MessageFilter::new(
            Self::NAME,
            rules.clone(),
            diagnostics,
            metrics.clone(),
        );

        info!(
            patterns = ?rules.patterns(),
            discovery = suppressor.has_discovery(),
            "SwitchFilter initialized"
        );

        Ok(Self {
            rules,
            message_filter: Arc::new(message_filter),
            lifecycle: Arc::new(LifecycleListener::new(Arc::new(suppressor))),
            metrics,
            started: AtomicBool::new(false),
        })
    }

    /// Register the listeners with the controller. Only once.
    pub fn start_up(&self, controller: &dyn ControllerService) -> Result<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(ModuleError::AlreadyStarted {
                module: Self::NAME.to_string(),
            }
            .into());
        }

        for kind in MessageFilter::FILTERED_TYPES {
            controller.add_message_listener(kind, self.message_filter.clone());
        }
        controller.add_switch_listener(self.lifecycle.clone());

        info!("SwitchFilter started");
        Ok(())
    }

    /// Add a filter pattern at runtime.
    ///
    /// Returns whether the pattern was new. Malformed patterns are rejected
    /// and leave the rule set unchanged.
    pub fn add_filter_pattern(&self, pattern: &str) -> Result<bool> {
        let inserted = self.rules.insert(pattern)?;
        if inserted {
            info!(pattern, "Filter pattern added");
        }
        Ok(inserted)
    }

    /// Module name
    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Whether `start_up` has run
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Shared rule set
    pub fn rules(&self) -> &Arc<FilterRuleSet> {
        &self.rules
    }

    /// The message listener registered with the controller
    pub fn message_filter(&self) -> &Arc<MessageFilter> {
        &self.message_filter
    }

    /// The switch listener registered with the controller
    pub fn lifecycle_listener(&self) -> &Arc<LifecycleListener> {
        &self.lifecycle
    }

    /// Counters collected so far
    pub fn stats(&self) -> FilterStats {
        self.metrics.snapshot()
    }
}
