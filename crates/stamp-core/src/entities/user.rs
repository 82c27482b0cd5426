use serde::{Deserialize, Serialize};

use crate::auditable::{AuditFields, Auditable, Persistable};

/// An account that can act on the system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// `None` until the first save.
    pub id: Option<String>,
    pub system_id: String,
    pub username: Option<String>,
    pub retired: bool,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl User {
    #[must_use]
    pub fn new(system_id: impl Into<String>) -> Self {
        Self {
            system_id: system_id.into(),
            ..Self::default()
        }
    }

    /// Compare everything except id and audit fields.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.system_id == other.system_id
            && self.username == other.username
            && self.retired == other.retired
    }
}

impl Auditable for User {
    fn audit_fields(&self) -> &AuditFields {
        &self.audit
    }

    fn audit_fields_mut(&mut self) -> &mut AuditFields {
        &mut self.audit
    }
}

impl Persistable for User {
    fn entity_type(&self) -> &'static str {
        "user"
    }

    fn as_auditable(&self) -> Option<&dyn Auditable> {
        Some(self)
    }

    fn as_auditable_mut(&mut self) -> Option<&mut dyn Auditable> {
        Some(self)
    }
}
