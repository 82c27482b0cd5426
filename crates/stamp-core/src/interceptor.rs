//! Audit stamping at the two persistence lifecycle points.
//!
//! - **on-create**: before the first write of an entity. Fills whichever of
//!   the four audit fields are unset and reports whether anything changed.
//! - **on-flush-dirty**: before a changed, already persisted entity is
//!   written again. Always overwrites `changed_by` / `date_changed`.
//!
//! The interceptor is stateless across calls. It reads the clock and the
//! acting identity at most once per call, so a fresh entity ends up with
//! `creator == changed_by` and `date_created == date_changed`.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::auditable::{AuditFields, Persistable};
use crate::clock::{Clock, SystemClock};
use crate::identity::{ActingIdentity, IdentityProvider};

/// Tunables for on-create stamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampPolicy {
    /// When `date_changed` is unset on create, copy `date_created` into it
    /// (including a caller-supplied historical `date_created`). When `false`,
    /// an unset `date_changed` gets the current time instead.
    pub mirror_date_created: bool,
}

impl Default for StampPolicy {
    fn default() -> Self {
        Self {
            mirror_date_created: true,
        }
    }
}

pub struct AuditableInterceptor {
    clock: Arc<dyn Clock>,
    policy: StampPolicy,
}

impl fmt::Debug for AuditableInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditableInterceptor")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for AuditableInterceptor {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl AuditableInterceptor {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            policy: StampPolicy::default(),
        }
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: StampPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub const fn policy(&self) -> StampPolicy {
        self.policy
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Fill the unset audit fields of a not-yet-persisted entity.
    ///
    /// Set fields are never touched. Returns `true` if any field was filled.
    pub fn stamp_created(
        &self,
        identity: &ActingIdentity,
        now: DateTime<Utc>,
        fields: &mut AuditFields,
    ) -> bool {
        let mut modified = false;

        if fields.creator.is_none() {
            fields.creator = Some(identity.clone());
            modified = true;
        }
        if fields.date_created.is_none() {
            fields.date_created = Some(now);
            modified = true;
        }
        if fields.changed_by.is_none() {
            fields.changed_by = Some(identity.clone());
            modified = true;
        }
        if fields.date_changed.is_none() {
            fields.date_changed = if self.policy.mirror_date_created {
                fields.date_created.or(Some(now))
            } else {
                Some(now)
            };
            modified = true;
        }

        modified
    }

    /// Credit a modification: overwrite `changed_by` and `date_changed`.
    pub fn stamp_changed(
        &self,
        identity: ActingIdentity,
        now: DateTime<Utc>,
        fields: &mut AuditFields,
    ) {
        fields.changed_by = Some(identity);
        fields.date_changed = Some(now);
    }

    /// Hook for an entity's first write.
    ///
    /// Returns `false` without touching anything when the entity is not
    /// auditable or already carries all four audit values (e.g. an import).
    pub fn on_create<P, E>(&self, provider: &P, entity: &mut E) -> bool
    where
        P: IdentityProvider + ?Sized,
        E: Persistable + ?Sized,
    {
        let entity_type = entity.entity_type();
        let Some(auditable) = entity.as_auditable_mut() else {
            return false;
        };

        let fields = auditable.audit_fields_mut();
        if fields.is_fully_stamped() {
            tracing::debug!(entity_type, "create: audit fields pre-stamped, left as-is");
            return false;
        }

        let identity = provider.acting_identity();
        let modified = self.stamp_created(&identity, self.now(), fields);
        tracing::debug!(entity_type, %identity, modified, "create: stamped audit fields");
        modified
    }

    /// Hook for a dirty flush of a persisted entity.
    ///
    /// `previous` is the last persisted audit state, if the engine has one.
    /// Returns `true` for every auditable entity.
    pub fn on_flush_dirty<P, E>(
        &self,
        provider: &P,
        entity: &mut E,
        previous: Option<&AuditFields>,
    ) -> bool
    where
        P: IdentityProvider + ?Sized,
        E: Persistable + ?Sized,
    {
        let entity_type = entity.entity_type();
        let Some(auditable) = entity.as_auditable_mut() else {
            return false;
        };

        let identity = provider.acting_identity();
        if let Some(prev) = previous.and_then(|p| p.changed_by.as_ref()) {
            tracing::trace!(entity_type, previous = %prev, "flush: previous modifier");
        }
        tracing::debug!(entity_type, %identity, "flush: stamped modification");
        self.stamp_changed(identity, self.now(), auditable.audit_fields_mut());
        true
    }
}
