//! Diagnostics go to stderr so stdout carries nothing but calculation output.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level '{level}'")]
    Filter {
        level: String,
        #[source]
        source: ParseError,
    },

    #[error("cannot install log subscriber: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Filter for `--log-level` / `PFC_LOG_LEVEL`.
fn level_filter(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(log_level).map_err(|source| TelemetryError::Filter {
        level: log_level.to_string(),
        source,
    })
}

/// Install the compact stderr subscriber. A valid `RUST_LOG` overrides
/// `log_level`.
pub fn init(log_level: &str) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => level_filter(log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
