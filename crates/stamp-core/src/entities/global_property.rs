use serde::{Deserialize, Serialize};

use crate::auditable::Persistable;

/// A system-wide setting. Not audited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalProperty {
    pub property: String,
    pub value: Option<String>,
}

impl GlobalProperty {
    #[must_use]
    pub fn new(property: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            property: property.into(),
            value: value.map(String::from),
        }
    }
}

impl Persistable for GlobalProperty {
    fn entity_type(&self) -> &'static str {
        "global_property"
    }
}
