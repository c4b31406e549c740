//! Notification dispatch for clock-in events.
//!
//! The wizard depends only on the `Notifier` trait. `NotificationService`
//! is the shipped implementation; it fans a notification out to every
//! enabled `NotificationIntegration` (tracing log, webhook).

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod integration;
mod log_integration;
mod service;
mod webhook_integration;

pub use integration::NotificationIntegration;
pub use log_integration::LogIntegration;
pub use service::NotificationService;
pub use webhook_integration::WebhookIntegration;

/// Topic used when an employee switches jobs mid-shift
pub const TOPIC_JOB_SWITCH: &str = "timecard.job_switch";

/// A notification for supervisors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub topic: String,
    pub title: String,
    pub message: String,
    /// In-app link the notification opens
    pub link: String,
    /// Id of the record the notification is about
    pub reference_id: String,
}

impl Notification {
    /// Notification sent when a timesheet is closed by a job switch
    pub fn job_switch(user_id: &str, previous_timesheet_id: &str, comment: Option<&str>) -> Self {
        let message = match comment {
            Some(c) if !c.trim().is_empty() => {
                format!("{} switched jobs: {}", user_id, c.trim())
            }
            _ => format!("{} switched jobs", user_id),
        };
        Self {
            topic: TOPIC_JOB_SWITCH.to_string(),
            title: "Timecard changed".to_string(),
            message,
            link: format!("/admins/timesheets?id={}", previous_timesheet_id),
            reference_id: previous_timesheet_id.to_string(),
        }
    }
}

/// Dispatches notifications to supervisors
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_notification(&self, notification: Notification) -> Result<()>;
}
