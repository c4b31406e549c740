//! Device location collaborator

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::LocationConfig;
use crate::types::Coordinates;

/// Outcome of starting clock-in location tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingResult {
    pub success: bool,
}

/// Access to the device's location and background tracking
#[async_trait]
pub trait LocationTracker: Send + Sync {
    /// Whether the user granted location permission
    async fn has_permission(&self) -> bool;

    /// Last known coordinates, if any have been captured
    async fn stored_coordinates(&self) -> Option<Coordinates>;

    /// Begin tracking for a clock session
    async fn start_clock_in_tracking(&self, user_id: &str, session_id: &str) -> TrackingResult;

    /// Whether tracking is already running for this session
    async fn is_tracking_active(&self, session_id: &str) -> bool;
}

/// Location source with fixed coordinates (CLI and kiosk deployments)
pub struct FixedLocation {
    permission_granted: bool,
    coordinates: Option<Coordinates>,
    tracked_sessions: Mutex<HashSet<String>>,
}

impl FixedLocation {
    pub fn new(coordinates: Option<Coordinates>, permission_granted: bool) -> Self {
        Self {
            permission_granted,
            coordinates,
            tracked_sessions: Mutex::new(HashSet::new()),
        }
    }

    pub fn from_config(config: &LocationConfig) -> Self {
        Self::new(config.coordinates(), config.permission_granted)
    }
}

#[async_trait]
impl LocationTracker for FixedLocation {
    async fn has_permission(&self) -> bool {
        self.permission_granted
    }

    async fn stored_coordinates(&self) -> Option<Coordinates> {
        if self.permission_granted {
            self.coordinates
        } else {
            None
        }
    }

    async fn start_clock_in_tracking(&self, user_id: &str, session_id: &str) -> TrackingResult {
        if !self.permission_granted {
            return TrackingResult { success: false };
        }
        self.tracked_sessions
            .lock()
            .await
            .insert(session_id.to_string());
        tracing::debug!(user_id, session_id, "Location tracking started");
        TrackingResult { success: true }
    }

    async fn is_tracking_active(&self, session_id: &str) -> bool {
        self.tracked_sessions.lock().await.contains(session_id)
    }
}
