//! Clock session persistence and resolution.
//!
//! Sessions are stored through the `SessionStore` trait. `resolve_session`
//! applies the business rule for picking the session a new timesheet is
//! booked under.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::InMemorySessionStore;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::api::{ApiError, TimesheetApi};
use crate::types::Session;

/// Errors raised by session stores
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session '{0}' not found")]
    NotFound(String),

    #[error("failed to access session file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse session file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to create session: {0}")]
    Create(#[from] ApiError),
}

/// Persistent store of clock sessions and each user's current-session pointer
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get_session(&self, id: &str) -> Result<Option<Session>, SessionError>;

    async fn insert_session(&self, session: Session) -> Result<(), SessionError>;

    /// Record the timesheet opened under a session
    async fn set_timesheet_id(&self, session_id: &str, timesheet_id: &str)
        -> Result<(), SessionError>;

    /// Drop every session belonging to `user_id`, and that user's pointer
    async fn clear_sessions(&self, user_id: &str) -> Result<(), SessionError>;

    async fn set_current_session(&self, user_id: &str, id: Option<&str>)
        -> Result<(), SessionError>;

    async fn current_session_id(&self, user_id: &str) -> Result<Option<String>, SessionError>;

    /// Every stored session, across users
    async fn list_sessions(&self) -> Result<Vec<Session>, SessionError>;
}

/// How a session was obtained for a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResolution {
    /// The current session is still open and was reused
    Reused(String),
    /// A new session was created (no current session, or the current one ended)
    Created(String),
    /// History was older than the expiry window; cleared, then created
    CreatedAfterExpiry(String),
}

impl SessionResolution {
    pub fn session_id(&self) -> &str {
        match self {
            SessionResolution::Reused(id)
            | SessionResolution::Created(id)
            | SessionResolution::CreatedAfterExpiry(id) => id,
        }
    }
}

/// Pick the session a new timesheet should be booked under.
///
/// Only `user_id`'s own pointer and sessions are consulted:
///
/// - no current session: create one
/// - current session still open: reuse it
/// - current session ended more than `expiry` ago: clear the user's
///   history, create one
/// - current session ended within `expiry`: create one, keep the old in history
pub async fn resolve_session(
    store: &dyn SessionStore,
    api: &dyn TimesheetApi,
    user_id: &str,
    now: DateTime<Utc>,
    expiry: Duration,
) -> Result<SessionResolution, SessionError> {
    let current = match store.current_session_id(user_id).await? {
        Some(id) => store
            .get_session(&id)
            .await?
            .filter(|session| session.user_id == user_id),
        None => None,
    };

    let expired = match &current {
        Some(session) if session.is_active() => {
            tracing::debug!(session_id = %session.id, "Reusing active session");
            return Ok(SessionResolution::Reused(session.id.clone()));
        }
        Some(session) => session.is_expired(now, expiry),
        None => false,
    };

    if expired {
        tracing::info!(user_id, "Previous session expired, clearing session history");
        store.clear_sessions(user_id).await?;
    }

    let id = api.create_session(user_id).await?;
    let mut session = Session::new(id.clone(), user_id);
    session.start_time = now;
    store.insert_session(session).await?;
    store.set_current_session(user_id, Some(&id)).await?;
    tracing::info!(user_id, session_id = %id, "Created clock session");

    Ok(if expired {
        SessionResolution::CreatedAfterExpiry(id)
    } else {
        SessionResolution::Created(id)
    })
}
