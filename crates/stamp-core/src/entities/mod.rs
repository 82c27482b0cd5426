//! Domain entities persisted through the stamp storage layer.
//!
//! `User` and `ConceptNumeric` are auditable; `GlobalProperty` is a plain
//! key/value row the interceptor ignores. The auditable entities compare
//! their non-audit content with `same_content`, which is how the storage
//! layer decides whether a save is a dirty flush.

mod concept;
mod global_property;
mod user;

pub use concept::ConceptNumeric;
pub use global_property::GlobalProperty;
pub use user::User;
