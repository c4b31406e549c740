//! Clock sessions and location coordinates

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// An in-progress or historical clock session.
///
/// A session groups the timesheets of one stretch of work; it is persisted
/// by a `SessionStore` and identified by the id the timesheet API assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    /// Timesheet opened in this session (set after a successful submit)
    #[serde(default)]
    pub timesheet_id: Option<String>,
    pub start_time: DateTime<Utc>,
    /// When the session was closed (None while active)
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            timesheet_id: None,
            start_time: Utc::now(),
            end_time: None,
        }
    }

    /// A session is active until it records an end time
    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    /// True when the session ended more than `max_age` before `now`
    pub fn is_expired(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        match self.end_time {
            Some(end) => now.signed_duration_since(end) > max_age,
            None => false,
        }
    }
}

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}
