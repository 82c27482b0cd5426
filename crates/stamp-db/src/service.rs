//! Service layer running audit stamping around database writes.
//!
//! `StampService` wraps `StampDb` (raw database access) and the
//! `AuditableInterceptor`. All repo methods are implemented as
//! `impl StampService` and take the caller's `ActingContext` explicitly.

use std::sync::Arc;

use stamp_config::StampConfig;
use stamp_core::{AuditableInterceptor, Clock, SystemClock};

use crate::StampDb;
use crate::error::DatabaseError;

/// What a save did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// First write; on-create ran.
    Inserted,
    /// Content changed; on-flush-dirty ran.
    Updated,
    /// Content matched the stored row; nothing was written.
    Unchanged,
}

/// Orchestrates database writes with audit stamping.
///
/// Every save follows this protocol:
/// 1. Decide create vs. update (has the entity an id?)
/// 2. For updates, load the stored row and skip if the content is unchanged
/// 3. Run the matching interceptor hook on the entity
/// 4. Write the row, audit columns included
pub struct StampService {
    db: StampDb,
    interceptor: AuditableInterceptor,
}

impl StampService {
    /// Create a new service over a local database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(
        db_path: &str,
        interceptor: AuditableInterceptor,
    ) -> Result<Self, DatabaseError> {
        let db = StampDb::open_local(db_path).await?;
        Ok(Self { db, interceptor })
    }

    /// Open the configured database with a wall-clock interceptor using the
    /// configured stamping policy.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn open(config: &StampConfig) -> Result<Self, DatabaseError> {
        Self::open_with_clock(config, Arc::new(SystemClock)).await
    }

    /// Like [`Self::open`] with an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn open_with_clock(
        config: &StampConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DatabaseError> {
        let interceptor = AuditableInterceptor::new(clock).with_policy(config.stamping.policy());
        tracing::debug!(path = %config.database.path, policy = ?interceptor.policy(), "opening stamp database");
        Self::new_local(&config.database.path, interceptor).await
    }

    /// Create from an existing `StampDb` (for testing).
    #[must_use]
    pub fn from_db(db: StampDb, interceptor: AuditableInterceptor) -> Self {
        Self { db, interceptor }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &StampDb {
        &self.db
    }

    /// Access the interceptor.
    #[must_use]
    pub const fn interceptor(&self) -> &AuditableInterceptor {
        &self.interceptor
    }
}
