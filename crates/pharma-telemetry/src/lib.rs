//! # Pharma Telemetry
//!
//! Structured logging setup for hosts embedding the Pharma-Trace contract.
//!
//! The contract crate only emits `tracing` events and spans. This crate
//! installs the subscriber that formats and filters them.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PHARMA_SERVICE_NAME` | `pharma-trace` | Service name on the startup event |
//! | `PHARMA_LOG_LEVEL` | `info` | Filter directive, falls back to `RUST_LOG` |
//! | `PHARMA_JSON_LOGS` | `false` | Emit JSON lines (`true` or `1`) |
//!
//! ## Usage
//!
//! ```no_run
//! use pharma_telemetry::{init_logging, TelemetryConfig};
//!
//! init_logging(&TelemetryConfig::from_env()).expect("logging already initialised");
//! tracing::info!("contract host ready");
//! ```

mod config;

pub use config::TelemetryConfig;

use thiserror::Error;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Telemetry errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Builds the filter, preferring `RUST_LOG` directives over the configured level.
fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Filter(e.to_string()))
}

/// Install the global subscriber.
///
/// Fails with [`TelemetryError::Init`] when a global subscriber is already set.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config)?;

    if config.json_logs {
        let json_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::Init(e.to_string()))?;
    } else {
        let fmt_layer = fmt::layer().with_target(true).with_ansi(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::Init(e.to_string()))?;
    }

    info!(
        service = %config.service_name,
        json = config.json_logs,
        "Logging initialised"
    );
    Ok(())
}
