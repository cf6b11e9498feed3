//! Structured logging with tracing
//!
//! Centralized logging setup for embedding applications. Degradations
//! inside the resolver (aggregator fallback, dropped ids) are only
//! visible through these logs, never through error returns, so hosts
//! that care should initialize a subscriber.

use crate::config::LoggingConfig;
use spr_domain::{Error, Result};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Initialize logging with the provided configuration
///
/// The `SPR_LOG` environment variable overrides the configured level
/// with a full filter directive. Fails if a global subscriber is
/// already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_env("SPR_LOG").or_else(|_| {
        EnvFilter::try_new(&config.level).map_err(|e| {
            Error::config_with_source(
                format!(
                    "invalid log level '{}': use trace, debug, info, warn, or error",
                    config.level
                ),
                e,
            )
        })
    })?;

    // Initialize based on json_format (layer types differ so we need
    // separate branches)
    let registry = Registry::default().with(filter);
    let result = if config.json_format {
        registry
            .with(fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    result.map_err(|e| Error::config_with_source("failed to install logging subscriber", e))?;

    info!(level = %config.level, "logging initialized");
    Ok(())
}
