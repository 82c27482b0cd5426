//! Audit stamping behaviour.

use serde::{Deserialize, Serialize};
use stamp_core::StampPolicy;

const fn default_mirror_date_created() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StampingConfig {
    /// On create, give an unset `date_changed` the value of `date_created`,
    /// even when the caller pre-populated `date_created`.
    #[serde(default = "default_mirror_date_created")]
    pub mirror_date_created: bool,
}

impl Default for StampingConfig {
    fn default() -> Self {
        Self {
            mirror_date_created: default_mirror_date_created(),
        }
    }
}

impl StampingConfig {
    #[must_use]
    pub const fn policy(&self) -> StampPolicy {
        StampPolicy {
            mirror_date_created: self.mirror_date_created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_mirrors() {
        assert_eq!(StampingConfig::default().policy(), StampPolicy::default());
    }
}
