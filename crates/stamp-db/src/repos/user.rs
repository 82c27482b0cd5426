//! User repository: save with audit stamping, lookup by id.

use stamp_core::ActingContext;
use stamp_core::entities::User;
use stamp_core::ids::PREFIX_USER;

use crate::error::DatabaseError;
use crate::helpers::{
    AUDIT_COLS, audit_values, changed_values, get_opt_string, opt_text, row_to_audit,
};
use crate::service::{SaveOutcome, StampService};

const SELECT_COLS: &str = "id, system_id, username, retired";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: Some(row.get(0)?),
        system_id: row.get(1)?,
        username: get_opt_string(row, 2)?,
        retired: row.get::<i64>(3)? != 0,
        audit: row_to_audit(row, 4)?,
    })
}

fn content_values(user: &User) -> Vec<libsql::Value> {
    vec![
        libsql::Value::Text(user.system_id.clone()),
        opt_text(user.username.as_deref()),
        libsql::Value::Integer(i64::from(user.retired)),
    ]
}

impl StampService {
    /// Persist a user, stamping audit fields on the way.
    ///
    /// A user without an id is inserted (and receives one). A user with an id
    /// is compared with its stored row and only written if its content changed.
    /// `creator` and `date_created` always come from the stored row on update.
    /// The caller's copy is only updated once the write succeeded.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the user has an id that is not stored,
    /// or any underlying query error.
    pub async fn save_user(
        &self,
        ctx: &ActingContext,
        user: &mut User,
    ) -> Result<SaveOutcome, DatabaseError> {
        let Some(id) = user.id.clone() else {
            let id = self.db().generate_id(PREFIX_USER).await?;
            let mut stamped = user.clone();
            self.interceptor().on_create(ctx, &mut stamped);

            let mut params = vec![libsql::Value::Text(id.clone())];
            params.extend(content_values(&stamped));
            params.extend(audit_values(&stamped.audit));
            self.db()
                .conn()
                .execute(
                    &format!(
                        "INSERT INTO users ({SELECT_COLS}, {AUDIT_COLS})
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
                    ),
                    libsql::params_from_iter(params),
                )
                .await?;

            tracing::debug!(user_id = %id, identity = %ctx.identity(), "inserted user");
            stamped.id = Some(id);
            *user = stamped;
            return Ok(SaveOutcome::Inserted);
        };

        let stored = self.get_user(&id).await?;
        if stored.same_content(user) {
            tracing::debug!(user_id = %id, "user unchanged, skipping flush");
            return Ok(SaveOutcome::Unchanged);
        }

        let mut flushed = user.clone();
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
                "UPDATE users SET system_id = ?1, username = ?2, retired = ?3,
                    changed_by = ?4, date_changed = ?5
                 WHERE id = ?6",
                libsql::params_from_iter(params),
            )
            .await?;

        tracing::debug!(user_id = %id, identity = %ctx.identity(), "updated user");
        *user = flushed;
        Ok(SaveOutcome::Updated)
    }

    /// Load a user by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no user has this id.
    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS}, {AUDIT_COLS} FROM users WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_user(&row)
    }
}
