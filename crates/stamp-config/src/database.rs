//! Local libSQL database configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_path() -> String {
    ".stamp/stamp.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database file path, or `:memory:`.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl DatabaseConfig {
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, ".stamp/stamp.db");
        assert!(!config.is_in_memory());
    }

    #[test]
    fn blank_path_rejected() {
        let config = DatabaseConfig { path: "  ".into() };
        assert!(config.validate().is_err());
    }
}
