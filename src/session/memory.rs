//! In-memory session store

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{SessionError, SessionStore};
use crate::types::Session;

#[derive(Debug, Default)]
struct Inner {
    sessions: Vec<Session>,
    current: HashMap<String, String>,
}

/// Session store held in process memory (REST server default and tests)
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: Mutex<Inner>,
    clears: AtomicUsize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `clear_sessions` has been called
    pub fn clear_calls(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_session(&self, id: &str) -> Result<Option<Session>, SessionError> {
        let inner = self.inner.lock().await;
        Ok(inner.sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_session(&self, session: Session) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;
        inner.sessions.retain(|s| s.id != session.id);
        inner.sessions.push(session);
        Ok(())
    }

    async fn set_timesheet_id(
        &self,
        session_id: &str,
        timesheet_id: &str,
    ) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;
        let session = inner
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
        session.timesheet_id = Some(timesheet_id.to_string());
        Ok(())
    }

    async fn clear_sessions(&self, user_id: &str) -> Result<(), SessionError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.inner.lock().await;
        inner.sessions.retain(|s| s.user_id != user_id);
        inner.current.remove(user_id);
        Ok(())
    }

    async fn set_current_session(
        &self,
        user_id: &str,
        id: Option<&str>,
    ) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;
        match id {
            Some(id) => inner.current.insert(user_id.to_string(), id.to_string()),
            None => inner.current.remove(user_id),
        };
        Ok(())
    }

    async fn current_session_id(&self, user_id: &str) -> Result<Option<String>, SessionError> {
        Ok(self.inner.lock().await.current.get(user_id).cloned())
    }

    async fn list_sessions(&self) -> Result<Vec<Session>, SessionError> {
        Ok(self.inner.lock().await.sessions.clone())
    }
}
