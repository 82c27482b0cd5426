//! Error types for stamp-core.
//!
//! `CoreError` covers value-level problems (parsing a stored identity, bad
//! input). `InterceptError` is raised only at the property-array boundary,
//! where the engine's mapping can disagree with the entity's audit
//! capability. Domain errors of the storage layer live in `stamp-db`.

use thiserror::Error;

/// Errors that can be raised by any stamp crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Mapping errors between an auditable entity and the engine's property arrays.
///
/// All variants are fatal: skipping the stamp would persist an unaudited row.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterceptError {
    /// The entity is auditable but the engine did not map one of the audit properties.
    #[error("Auditable entity {entity_type} has no mapped property '{property}'")]
    MissingProperty {
        entity_type: String,
        property: String,
    },

    /// Property names and state arrays disagree in length.
    #[error("Snapshot mismatch for {entity_type}: {names} property names, {values} values")]
    SnapshotMismatch {
        entity_type: String,
        names: usize,
        values: usize,
    },
}
