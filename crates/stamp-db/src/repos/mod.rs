//! Repository modules for stamp entities.
//!
//! Each module adds methods to `StampService` via `impl StampService` blocks.

pub mod concept;
pub mod global_property;
pub mod user;
