//! # stamp-db
//!
//! libSQL persistence for stamp entities.
//!
//! Plays the part of the persistence engine around the audit interceptor:
//! a first save is an insert and runs the on-create hook, a later save whose
//! content differs from the stored row is a dirty flush and runs the
//! on-flush-dirty hook with the stored audit fields as previous state.
//!
//! Uses the `libsql` crate (C `SQLite` fork) in local mode.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod telemetry;
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle.
///
/// Wraps a libSQL database and connection and provides ID generation.
pub struct StampDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl StampDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let stamp_db = Self { db, conn };
        stamp_db.run_migrations().await?;
        Ok(stamp_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"usr-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT ?1 || '-' || lower(hex(randomblob(4)))", [prefix])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
