//! Property-array boundary.
//!
//! Some engines hand a hook the entity's state as parallel arrays of
//! property names and values. This module maps the four audit properties
//! out of such arrays, runs the typed stamping, and writes the results back.
//! An auditable entity whose arrays lack an audit property is a mapping error
//! and is reported, never skipped.

use chrono::{DateTime, Utc};

use crate::auditable::{AuditFields, Persistable};
use crate::errors::InterceptError;
use crate::identity::{ActingIdentity, IdentityProvider};
use crate::interceptor::AuditableInterceptor;

pub const CREATOR: &str = "creator";
pub const DATE_CREATED: &str = "dateCreated";
pub const CHANGED_BY: &str = "changedBy";
pub const DATE_CHANGED: &str = "dateChanged";

/// One slot of an engine-side state array.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Identity(ActingIdentity),
    Timestamp(DateTime<Utc>),
    Text(String),
    Integer(i64),
    Float(f64),
}

impl PropertyValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<Option<ActingIdentity>> for PropertyValue {
    fn from(value: Option<ActingIdentity>) -> Self {
        value.map_or(Self::Null, Self::Identity)
    }
}

impl From<Option<DateTime<Utc>>> for PropertyValue {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(Self::Null, Self::Timestamp)
    }
}

fn position(entity_type: &str, names: &[&str], property: &str) -> Result<usize, InterceptError> {
    names.iter().position(|n| *n == property).ok_or_else(|| {
        tracing::error!(entity_type, property, "auditable entity is missing an audit mapping");
        InterceptError::MissingProperty {
            entity_type: entity_type.to_string(),
            property: property.to_string(),
        }
    })
}

fn check_len(entity_type: &str, names: &[&str], values: usize) -> Result<(), InterceptError> {
    if names.len() == values {
        return Ok(());
    }
    Err(InterceptError::SnapshotMismatch {
        entity_type: entity_type.to_string(),
        names: names.len(),
        values,
    })
}

fn as_identity(value: &PropertyValue) -> Option<ActingIdentity> {
    match value {
        PropertyValue::Identity(identity) => Some(identity.clone()),
        _ => None,
    }
}

fn as_timestamp(value: &PropertyValue) -> Option<DateTime<Utc>> {
    match value {
        PropertyValue::Timestamp(at) => Some(*at),
        _ => None,
    }
}

impl AuditableInterceptor {
    /// Array form of [`AuditableInterceptor::on_create`].
    ///
    /// Only null slots are unset. A slot holding any other value is left as
    /// the engine passed it.
    ///
    /// # Errors
    ///
    /// Returns `InterceptError` if the entity is auditable and `names`/`state`
    /// do not carry all four audit properties.
    pub fn on_save_state<P, E>(
        &self,
        provider: &P,
        entity: &E,
        state: &mut [PropertyValue],
        names: &[&str],
    ) -> Result<bool, InterceptError>
    where
        P: IdentityProvider + ?Sized,
        E: Persistable + ?Sized,
    {
        if entity.as_auditable().is_none() {
            return Ok(false);
        }
        let entity_type = entity.entity_type();
        check_len(entity_type, names, state.len())?;

        let creator_at = position(entity_type, names, CREATOR)?;
        let created_at = position(entity_type, names, DATE_CREATED)?;
        let changed_by_at = position(entity_type, names, CHANGED_BY)?;
        let changed_at = position(entity_type, names, DATE_CHANGED)?;

        let slots = [creator_at, created_at, changed_by_at, changed_at];
        if slots.iter().all(|&at| !state[at].is_null()) {
            return Ok(false);
        }

        // Non-null slots count as set whatever their kind; only null slots are written.
        let mut fields = AuditFields {
            creator: as_identity(&state[creator_at]),
            date_created: as_timestamp(&state[created_at]),
            changed_by: as_identity(&state[changed_by_at]),
            date_changed: as_timestamp(&state[changed_at]),
        };
        let identity = provider.acting_identity();
        let modified = self.stamp_created(&identity, self.now(), &mut fields);

        let stamped: [PropertyValue; 4] = [
            fields.creator.into(),
            fields.date_created.into(),
            fields.changed_by.into(),
            fields.date_changed.into(),
        ];
        for (at, value) in slots.into_iter().zip(stamped) {
            if state[at].is_null() {
                state[at] = value;
            }
        }
        tracing::debug!(entity_type, %identity, modified, "create: stamped property state");
        Ok(modified)
    }

    /// Array form of [`AuditableInterceptor::on_flush_dirty`].
    ///
    /// Only `changedBy` and `dateChanged` need to be mapped. The previous
    /// state may be absent; when present it must match `names` in length.
    ///
    /// # Errors
    ///
    /// Returns `InterceptError` if the entity is auditable and the arrays do
    /// not carry `changedBy` and `dateChanged`, or their lengths disagree.
    pub fn on_flush_dirty_state<P, E>(
        &self,
        provider: &P,
        entity: &E,
        current: &mut [PropertyValue],
        previous: Option<&[PropertyValue]>,
        names: &[&str],
    ) -> Result<bool, InterceptError>
    where
        P: IdentityProvider + ?Sized,
        E: Persistable + ?Sized,
    {
        if entity.as_auditable().is_none() {
            return Ok(false);
        }
        let entity_type = entity.entity_type();
        check_len(entity_type, names, current.len())?;
        if let Some(previous) = previous {
            check_len(entity_type, names, previous.len())?;
        }

        let changed_by_at = position(entity_type, names, CHANGED_BY)?;
        let changed_at = position(entity_type, names, DATE_CHANGED)?;

        let mut fields = AuditFields::unset();
        let identity = provider.acting_identity();
        tracing::debug!(entity_type, %identity, "flush: stamped property state");
        self.stamp_changed(identity, self.now(), &mut fields);

        current[changed_by_at] = fields.changed_by.into();
        current[changed_at] = fields.date_changed.into();
        Ok(true)
    }
}
