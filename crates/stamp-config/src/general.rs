//! General application configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Levels accepted by the tracing filter.
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default tracing level. `STAMP_LOG` still overrides it at runtime.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl GeneralConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Ok(());
        }
        Err(ConfigError::InvalidValue {
            field: "general.log_level".into(),
            reason: format!("expected one of {LOG_LEVELS:?}, got '{}'", self.log_level),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.log_level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_level_rejected() {
        let config = GeneralConfig {
            log_level: "loud".into(),
        };
        assert!(config.validate().is_err());
    }
}
