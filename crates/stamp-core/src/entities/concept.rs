use serde::{Deserialize, Serialize};

use crate::auditable::{AuditFields, Auditable, Persistable};

/// A numeric concept with absolute bounds, e.g. a weight in kg.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptNumeric {
    pub id: Option<String>,
    pub name: String,
    pub hi_absolute: Option<f64>,
    pub low_absolute: Option<f64>,
    pub units: Option<String>,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl ConceptNumeric {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.name == other.name
            && self.hi_absolute == other.hi_absolute
            && self.low_absolute == other.low_absolute
            && self.units == other.units
    }
}

impl Auditable for ConceptNumeric {
    fn audit_fields(&self) -> &AuditFields {
        &self.audit
    }

    fn audit_fields_mut(&mut self) -> &mut AuditFields {
        &mut self.audit
    }
}

impl Persistable for ConceptNumeric {
    fn entity_type(&self) -> &'static str {
        "concept_numeric"
    }

    fn as_auditable(&self) -> Option<&dyn Auditable> {
        Some(self)
    }

    fn as_auditable_mut(&mut self) -> Option<&mut dyn Auditable> {
        Some(self)
    }
}
