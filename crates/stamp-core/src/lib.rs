//! # stamp-core
//!
//! Audit metadata stamping for persisted entities.
//!
//! This crate provides the pieces every persistence layer needs to credit
//! creation and modification of an entity:
//! - The `Auditable` capability and its typed `AuditFields` snapshot
//! - Acting identity (authenticated user or the daemon principal) and
//!   explicit execution contexts
//! - Clock abstraction for the stamped timestamps
//! - `AuditableInterceptor` with the on-create and on-flush-dirty hooks
//! - The property-array boundary for engines that pass parallel arrays
//! - Sample domain entities, ID prefixes and cross-cutting error types

pub mod auditable;
pub mod clock;
pub mod entities;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod interceptor;
pub mod snapshot;

pub use auditable::{AuditFields, Auditable, Persistable};
pub use clock::{Clock, FixedClock, ManualClock, SystemClock};
pub use errors::{CoreError, InterceptError};
pub use identity::{ActingContext, ActingIdentity, Daemon, IdentityProvider, ScheduledTask, UserRef};
pub use interceptor::{AuditableInterceptor, StampPolicy};
