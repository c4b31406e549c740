//! JSON-file backed session store

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{SessionError, SessionStore};
use crate::types::Session;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionFile {
    /// Current session per user id
    #[serde(default)]
    current_sessions: BTreeMap<String, String>,
    #[serde(default)]
    sessions: Vec<Session>,
}

/// Session store persisted to `<state>/sessions.json`.
///
/// The file is rewritten after every mutation; a missing file reads as an
/// empty store.
pub struct FileSessionStore {
    path: PathBuf,
    state: Mutex<SessionFile>,
}

impl FileSessionStore {
    /// Open (or lazily create) the store at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            SessionFile::default()
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self, state: &SessionFile) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string_pretty(state)?;
        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get_session(&self, id: &str) -> Result<Option<Session>, SessionError> {
        let state = self.state.lock().await;
        Ok(state.sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_session(&self, session: Session) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        state.sessions.retain(|s| s.id != session.id);
        state.sessions.push(session);
        self.save(&state).await
    }

    async fn set_timesheet_id(
        &self,
        session_id: &str,
        timesheet_id: &str,
    ) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        let session = state
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
        session.timesheet_id = Some(timesheet_id.to_string());
        self.save(&state).await
    }

    async fn clear_sessions(&self, user_id: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        state.sessions.retain(|s| s.user_id != user_id);
        state.current_sessions.remove(user_id);
        self.save(&state).await
    }

    async fn set_current_session(
        &self,
        user_id: &str,
        id: Option<&str>,
    ) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        match id {
            Some(id) => state
                .current_sessions
                .insert(user_id.to_string(), id.to_string()),
            None => state.current_sessions.remove(user_id),
        };
        self.save(&state).await
    }

    async fn current_session_id(&self, user_id: &str) -> Result<Option<String>, SessionError> {
        Ok(self.state.lock().await.current_sessions.get(user_id).cloned())
    }

    async fn list_sessions(&self) -> Result<Vec<Session>, SessionError> {
        Ok(self.state.lock().await.sessions.clone())
    }
}
