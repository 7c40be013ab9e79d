//! # SwitchFilter
//!
//! Control-plane policy module for an SDN controller. Switches whose
//! identifier matches a configured pattern have their PACKET_IN traffic
//! dropped and their link-discovery probes suppressed.
//!
//! The controller itself (dispatch, switch connections, topology discovery)
//! is the host. It reaches this module through [`ControllerService`] and
//! the listener traits re-exported from [`switchfilter_engine`].
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use switchfilter::{AppConfig, ControllerService, SwitchFilterModule, TracingDiagnostics};
//!
//! fn wire<C: ControllerService + 'static>(controller: Arc<C>) -> anyhow::Result<SwitchFilterModule> {
//!     let config = AppConfig::from_file("switchfilter.yaml")?;
//!     switchfilter::telemetry::init_tracing(&config.logging)?;
//!
//!     let module = SwitchFilterModule::init(
//!         &config.filter,
//!         controller.clone(),
//!         None,
//!         Arc::new(TracingDiagnostics),
//!     )?;
//!     module.start_up(controller.as_ref())?;
//!     Ok(module)
//! }
//! ```

pub mod module;
pub mod telemetry;

pub use module::{ControllerService, SwitchFilterModule};
pub use switchfilter_core::{AppConfig, FilterSettings, LoggingConfig};
pub use switchfilter_engine::{
    DiagnosticEvent, Diagnostics, LinkDiscoveryService, MessageListener, RecordingDiagnostics,
    SwitchHandle, SwitchListener, SwitchService, SwitchSnapshot, TracingDiagnostics,
};
