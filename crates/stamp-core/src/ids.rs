//! ID prefixes for persisted entities.
//!
//! IDs have the form `{prefix}-{8 hex chars}`, e.g. `usr-a3f8b2c1`.

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_CONCEPT: &str = "cpt";

pub const ALL_PREFIXES: &[&str] = &[PREFIX_USER, PREFIX_CONCEPT];
