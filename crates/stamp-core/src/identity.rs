//! Acting identity and explicit execution contexts.
//!
//! Every persisted mutation is credited to an `ActingIdentity`: either an
//! authenticated user or the daemon principal used by scheduled and other
//! unattended work. The identity travels explicitly in an `ActingContext`
//! owned by the caller's transaction; nothing here is global.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

const USER_PREFIX: &str = "user:";
const DAEMON_TEXT: &str = "daemon";

/// Lightweight authenticated user reference.
///
/// Produced by whatever authenticates the caller; only stored, never inspected
/// by the interceptor. Equality and hashing use `user_id` alone: the username
/// is display data and is not part of the stored form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub user_id: String,
    pub username: Option<String>,
}

impl UserRef {
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: None,
        }
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

impl PartialEq for UserRef {
    fn eq(&self, other: &Self) -> bool {
        self.user_id == other.user_id
    }
}

impl Eq for UserRef {}

impl Hash for UserRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.user_id.hash(state);
    }
}

/// The principal credited with the current operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActingIdentity {
    /// A caller who authenticated normally.
    User(UserRef),
    /// The system principal for background and scheduled work.
    Daemon,
}

impl ActingIdentity {
    #[must_use]
    pub const fn is_daemon(&self) -> bool {
        matches!(self, Self::Daemon)
    }

    /// Stable text form used for storage: `user:<user_id>` or `daemon`.
    ///
    /// The username is not part of the stored form.
    #[must_use]
    pub fn as_stored(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ActingIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(user) => write!(f, "{USER_PREFIX}{}", user.user_id),
            Self::Daemon => f.write_str(DAEMON_TEXT),
        }
    }
}

impl FromStr for ActingIdentity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == DAEMON_TEXT {
            return Ok(Self::Daemon);
        }
        match s.strip_prefix(USER_PREFIX) {
            Some(user_id) if !user_id.is_empty() => Ok(Self::User(UserRef::new(user_id))),
            _ => Err(CoreError::Validation(format!(
                "'{s}' is not a stored acting identity"
            ))),
        }
    }
}

/// Answers "who is acting now" for the calling transaction.
pub trait IdentityProvider: Send + Sync {
    fn acting_identity(&self) -> ActingIdentity;
}

/// Execution context for one logical unit of work.
///
/// Each transaction gets its own context, so concurrent transactions never
/// observe each other's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActingContext {
    identity: ActingIdentity,
}

impl ActingContext {
    #[must_use]
    pub const fn new(identity: ActingIdentity) -> Self {
        Self { identity }
    }

    #[must_use]
    pub const fn authenticated(user: UserRef) -> Self {
        Self::new(ActingIdentity::User(user))
    }

    #[must_use]
    pub const fn daemon() -> Self {
        Self::new(ActingIdentity::Daemon)
    }

    #[must_use]
    pub const fn identity(&self) -> &ActingIdentity {
        &self.identity
    }

    #[must_use]
    pub const fn is_daemon(&self) -> bool {
        self.identity.is_daemon()
    }
}

impl IdentityProvider for ActingContext {
    fn acting_identity(&self) -> ActingIdentity {
        self.identity.clone()
    }
}

/// A unit of unattended work run by a scheduler.
///
/// Tasks are awaited inline by whoever drives them, so they may hold
/// non-`Send` handles such as a storage service borrowed from the caller.
#[async_trait(?Send)]
pub trait ScheduledTask {
    fn name(&self) -> &str;

    /// Run the task under the given context.
    ///
    /// # Errors
    ///
    /// Whatever the task itself fails with.
    async fn execute(&self, ctx: &ActingContext) -> anyhow::Result<()>;
}

/// Runs work as the daemon principal.
pub struct Daemon;

impl Daemon {
    /// A fresh daemon context.
    #[must_use]
    pub const fn context() -> ActingContext {
        ActingContext::daemon()
    }

    /// Execute a scheduled task under a daemon context.
    ///
    /// # Errors
    ///
    /// Propagates the task's error unchanged.
    pub async fn execute_scheduled_task<T: ScheduledTask + ?Sized>(
        task: &T,
    ) -> anyhow::Result<()> {
        let ctx = Self::context();
        tracing::debug!(task = task.name(), "executing scheduled task as daemon");
        let result = task.execute(&ctx).await;
        match &result {
            Ok(()) => tracing::debug!(task = task.name(), "scheduled task finished"),
            Err(e) => tracing::warn!(task = task.name(), error = %e, "scheduled task failed"),
        }
        result
    }
}
