//! Global property repository. Not auditable; the hooks still run and decline.

use stamp_core::ActingContext;
use stamp_core::entities::GlobalProperty;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, opt_text};
use crate::service::{SaveOutcome, StampService};

impl StampService {
    /// Insert or update a global property by name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn save_global_property(
        &self,
        ctx: &ActingContext,
        property: &mut GlobalProperty,
    ) -> Result<SaveOutcome, DatabaseError> {
        let stored = self.find_global_property(&property.property).await?;
        let outcome = match stored {
            None => {
                let stamped = self.interceptor().on_create(ctx, property);
                debug_assert!(!stamped, "global properties are not auditable");
                SaveOutcome::Inserted
            }
            Some(ref existing) if *existing == *property => return Ok(SaveOutcome::Unchanged),
            Some(_) => {
                self.interceptor().on_flush_dirty(ctx, property, None);
                SaveOutcome::Updated
            }
        };

        self.db()
            .conn()
            .execute(
                "INSERT INTO global_properties (property, value) VALUES (?1, ?2)
                 ON CONFLICT(property) DO UPDATE SET value = excluded.value",
                libsql::params_from_iter([
                    libsql::Value::Text(property.property.clone()),
                    opt_text(property.value.as_deref()),
                ]),
            )
            .await?;
        Ok(outcome)
    }

    /// Load a global property by name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the property is not set.
    pub async fn get_global_property(&self, name: &str) -> Result<GlobalProperty, DatabaseError> {
        self.find_global_property(name)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    async fn find_global_property(
        &self,
        name: &str,
    ) -> Result<Option<GlobalProperty>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT property, value FROM global_properties WHERE property = ?1",
                [name],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(GlobalProperty {
                property: row.get(0)?,
                value: get_opt_string(&row, 1)?,
            })),
            None => Ok(None),
        }
    }
}
