//! The audit capability.
//!
//! An entity opts in by implementing `Auditable` and returning itself from
//! `Persistable::as_auditable_mut`. Everything else is a plain object the
//! interceptor leaves alone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::ActingIdentity;

/// Typed snapshot of the four audit fields.
///
/// `None` means "unset" and is a valid state for a not-yet-persisted entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFields {
    pub creator: Option<ActingIdentity>,
    pub date_created: Option<DateTime<Utc>>,
    pub changed_by: Option<ActingIdentity>,
    pub date_changed: Option<DateTime<Utc>>,
}

impl AuditFields {
    /// All four fields unset.
    #[must_use]
    pub const fn unset() -> Self {
        Self {
            creator: None,
            date_created: None,
            changed_by: None,
            date_changed: None,
        }
    }

    /// All four fields set, as if one identity created the entity at `at`.
    #[must_use]
    pub fn new_stamped(identity: ActingIdentity, at: DateTime<Utc>) -> Self {
        Self {
            creator: Some(identity.clone()),
            date_created: Some(at),
            changed_by: Some(identity),
            date_changed: Some(at),
        }
    }

    #[must_use]
    pub const fn is_fully_stamped(&self) -> bool {
        self.creator.is_some()
            && self.date_created.is_some()
            && self.changed_by.is_some()
            && self.date_changed.is_some()
    }
}

/// Capability: the entity carries creator/modifier metadata.
pub trait Auditable {
    fn audit_fields(&self) -> &AuditFields;

    fn audit_fields_mut(&mut self) -> &mut AuditFields;

    fn creator(&self) -> Option<&ActingIdentity> {
        self.audit_fields().creator.as_ref()
    }

    fn set_creator(&mut self, creator: Option<ActingIdentity>) {
        self.audit_fields_mut().creator = creator;
    }

    fn date_created(&self) -> Option<DateTime<Utc>> {
        self.audit_fields().date_created
    }

    fn set_date_created(&mut self, at: Option<DateTime<Utc>>) {
        self.audit_fields_mut().date_created = at;
    }

    fn changed_by(&self) -> Option<&ActingIdentity> {
        self.audit_fields().changed_by.as_ref()
    }

    fn set_changed_by(&mut self, changed_by: Option<ActingIdentity>) {
        self.audit_fields_mut().changed_by = changed_by;
    }

    fn date_changed(&self) -> Option<DateTime<Utc>> {
        self.audit_fields().date_changed
    }

    fn set_date_changed(&mut self, at: Option<DateTime<Utc>>) {
        self.audit_fields_mut().date_changed = at;
    }
}

/// Anything the persistence layer can write.
pub trait Persistable {
    /// Short type name used in logs and mapping errors.
    fn entity_type(&self) -> &'static str;

    fn as_auditable(&self) -> Option<&dyn Auditable> {
        None
    }

    fn as_auditable_mut(&mut self) -> Option<&mut dyn Auditable> {
        None
    }
}
