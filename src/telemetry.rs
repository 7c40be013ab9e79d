//! Tracing subscriber setup for hosts embedding the module

use anyhow::{anyhow, Context, Result};
use switchfilter_core::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Build the event filter for a logging configuration.
///
/// `RUST_LOG`, when set, wins over the configured levels.
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    config_env_filter(config)
}

/// Build the event filter from the configuration alone
pub fn config_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    config
        .parse_level()
        .context("Failed to parse logging level")?;

    let mut filter = EnvFilter::new(config.level.to_lowercase());
    for (module, module_level) in &config.module_levels {
        let directive = format!("{}={}", module, module_level)
            .parse()
            .with_context(|| format!("Invalid log directive for module {}", module))?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

/// Install the global tracing subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_env_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
    .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
}
