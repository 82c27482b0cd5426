//! Tracing subscriber setup.

use stamp_config::GeneralConfig;

use crate::error::DatabaseError;

/// Env var that overrides the configured level with a full filter directive.
pub const LOG_ENV: &str = "STAMP_LOG";

/// Build the filter: `STAMP_LOG` if set, otherwise `general.log_level`.
fn env_filter(general: &GeneralConfig) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&general.log_level))
}

/// Install a global `fmt` subscriber at the configured `[general] log_level`.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if a global subscriber is already installed.
pub fn init_tracing(general: &GeneralConfig) -> Result<(), DatabaseError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(general))
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
