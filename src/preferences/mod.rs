//! UI preference collaborator (cookie-backed in the browser)
//!
//! One server hosts wizards for many users, so every preference is keyed by
//! user id.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Preferences the wizard updates after a successful clock-in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceValues {
    #[serde(default)]
    pub current_page_view: Option<String>,
    #[serde(default)]
    pub work_role: Option<String>,
    #[serde(default)]
    pub labor_type: Option<String>,
}

#[async_trait]
pub trait Preferences: Send + Sync {
    async fn set_current_page_view(&self, user_id: &str, view: &str) -> anyhow::Result<()>;
    async fn set_work_role(&self, user_id: &str, role: &str) -> anyhow::Result<()>;
    async fn set_labor_type(&self, user_id: &str, labor_type: &str) -> anyhow::Result<()>;

    /// Stored values for `user_id` (all unset when nothing was stored)
    async fn values(&self, user_id: &str) -> PreferenceValues;
}

/// Preferences kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryPreferences {
    values: Mutex<HashMap<String, PreferenceValues>>,
}

impl InMemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    async fn update(&self, user_id: &str, apply: impl FnOnce(&mut PreferenceValues) + Send) {
        let mut values = self.values.lock().await;
        apply(values.entry(user_id.to_string()).or_default());
    }
}

#[async_trait]
impl Preferences for InMemoryPreferences {
    async fn set_current_page_view(&self, user_id: &str, view: &str) -> anyhow::Result<()> {
        self.update(user_id, |v| v.current_page_view = Some(view.to_string()))
            .await;
        Ok(())
    }

    async fn set_work_role(&self, user_id: &str, role: &str) -> anyhow::Result<()> {
        self.update(user_id, |v| v.work_role = Some(role.to_string()))
            .await;
        Ok(())
    }

    async fn set_labor_type(&self, user_id: &str, labor_type: &str) -> anyhow::Result<()> {
        self.update(user_id, |v| v.labor_type = Some(labor_type.to_string()))
            .await;
        Ok(())
    }

    async fn values(&self, user_id: &str) -> PreferenceValues {
        self.values
            .lock()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }
}

/// Preferences persisted to `<state>/preferences.json`, one entry per user
pub struct FilePreferences {
    path: PathBuf,
    values: Mutex<BTreeMap<String, PreferenceValues>>,
}

impl FilePreferences {
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    async fn update(
        &self,
        user_id: &str,
        apply: impl FnOnce(&mut PreferenceValues) + Send,
    ) -> anyhow::Result<()> {
        let mut values = self.values.lock().await;
        apply(values.entry(user_id.to_string()).or_default());
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_string_pretty(&*values)?).await?;
        Ok(())
    }
}

#[async_trait]
impl Preferences for FilePreferences {
    async fn set_current_page_view(&self, user_id: &str, view: &str) -> anyhow::Result<()> {
        let view = view.to_string();
        self.update(user_id, move |v| v.current_page_view = Some(view))
            .await
    }

    async fn set_work_role(&self, user_id: &str, role: &str) -> anyhow::Result<()> {
        let role = role.to_string();
        self.update(user_id, move |v| v.work_role = Some(role)).await
    }

    async fn set_labor_type(&self, user_id: &str, labor_type: &str) -> anyhow::Result<()> {
        let labor_type = labor_type.to_string();
        self.update(user_id, move |v| v.labor_type = Some(labor_type))
            .await
    }

    async fn values(&self, user_id: &str) -> PreferenceValues {
        self.values
            .lock()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_in_memory_preferences_are_per_user() {
        let prefs = InMemoryPreferences::new();
        prefs.set_work_role("u-1", "truck").await.unwrap();
        prefs.set_labor_type("u-1", "truckDriver").await.unwrap();
        prefs.set_work_role("u-2", "mechanic").await.unwrap();

        let first = prefs.values("u-1").await;
        assert_eq!(first.work_role.as_deref(), Some("truck"));
        assert_eq!(first.labor_type.as_deref(), Some("truckDriver"));
        assert!(first.current_page_view.is_none());

        let second = prefs.values("u-2").await;
        assert_eq!(second.work_role.as_deref(), Some("mechanic"));
        assert!(second.labor_type.is_none());

        assert_eq!(prefs.values("u-3").await, PreferenceValues::default());
    }

    #[tokio::test]
    async fn test_file_preferences_persist_per_user() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");

        let prefs = FilePreferences::open(&path).unwrap();
        prefs.set_current_page_view("u-1", "dashboard").await.unwrap();
        prefs.set_work_role("u-1", "mechanic").await.unwrap();
        prefs.set_work_role("u-2", "tasco").await.unwrap();

        let reopened = FilePreferences::open(&path).unwrap();
        let values = reopened.values("u-1").await;
        assert_eq!(values.current_page_view.as_deref(), Some("dashboard"));
        assert_eq!(values.work_role.as_deref(), Some("mechanic"));
        assert_eq!(
            reopened.values("u-2").await.work_role.as_deref(),
            Some("tasco")
        );
    }
}
