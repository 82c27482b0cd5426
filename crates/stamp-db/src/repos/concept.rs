//! Numeric concept repository.

use stamp_core::ActingContext;
use stamp_core::entities::ConceptNumeric;
use stamp_core::ids::PREFIX_CONCEPT;

use crate::error::DatabaseError;
use crate::helpers::{
    AUDIT_COLS, audit_values, changed_values, get_opt_string, opt_real, opt_text, row_to_audit,
};
use crate::service::{SaveOutcome, StampService};

const SELECT_COLS: &str = "id, name, hi_absolute, low_absolute, units";

fn row_to_concept(row: &libsql::Row) -> Result<ConceptNumeric, DatabaseError> {
    Ok(ConceptNumeric {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        hi_absolute: row.get::<Option<f64>>(2)?,
        low_absolute: row.get::<Option<f64>>(3)?,
        units: get_opt_string(row, 4)?,
        audit: row_to_audit(row, 5)?,
    })
}

fn content_values(concept: &ConceptNumeric) -> Vec<libsql::Value> {
    vec![
        libsql::Value::Text(concept.name.clone()),
        opt_real(concept.hi_absolute),
        opt_real(concept.low_absolute),
        opt_text(concept.units.as_deref()),
    ]
}

impl StampService {
    /// Persist a numeric concept, stamping audit fields on the way.
    ///
    /// Same protocol as [`StampService::save_user`].
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the concept has an id that is not
    /// stored, or any underlying query error.
    pub async fn save_concept_numeric(
        &self,
        ctx: &ActingContext,
        concept: &mut ConceptNumeric,
    ) -> Result<SaveOutcome, DatabaseError> {
        let Some(id) = concept.id.clone() else {
            let id = self.db().generate_id(PREFIX_CONCEPT).await?;
            let mut stamped = concept.clone();
            self.interceptor().on_create(ctx, &mut stamped);

            let mut params = vec![libsql::Value::Text(id.clone())];
            params.extend(content_values(&stamped));
            params.extend(audit_values(&stamped.audit));
            self.db()
                .conn()
                .execute(
                    &format!(
                        "INSERT INTO concept_numerics ({SELECT_COLS}, {AUDIT_COLS})
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                    ),
                    libsql::params_from_iter(params),
                )
                .await?;

            tracing::debug!(concept_id = %id, identity = %ctx.identity(), "inserted concept");
            stamped.id = Some(id);
            *concept = stamped;
            return Ok(SaveOutcome::Inserted);
        };

        let stored = self.get_concept_numeric(&id).await?;
        if stored.same_content(concept) {
            return Ok(SaveOutcome::Unchanged);
        }

        let mut flushed = concept.clone();
        flushed.audit.creator.clone_from(&stored.audit.creator);
        flushed.audit.date_created = stored.audit.date_created;
        self.interceptor()
            .on_flush_dirty(ctx, &mut flushed, Some(&stored.audit));

        let mut params = content_values(&flushed);
        params.extend(changed_values(&flushed.audit));
        params.push(libsql::Value::Text(id.clone()));
        self.db()
            .conn()
            .execute(
                "UPDATE concept_numerics SET name = ?1, hi_absolute = ?2, low_absolute = ?3,
                    units = ?4, changed_by = ?5, date_changed = ?6
                 WHERE id = ?7",
                libsql::params_from_iter(params),
            )
            .await?;

        tracing::debug!(concept_id = %id, identity = %ctx.identity(), "updated concept");
        *concept = flushed;
        Ok(SaveOutcome::Updated)
    }

    /// Load a numeric concept by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no concept has this id.
    pub async fn get_concept_numeric(&self, id: &str) -> Result<ConceptNumeric, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS}, {AUDIT_COLS} FROM concept_numerics WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_concept(&row)
    }
}
