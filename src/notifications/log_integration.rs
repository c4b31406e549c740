//! Integration that records notifications as tracing events.

use anyhow::Result;
use async_trait::async_trait;

use super::integration::NotificationIntegration;
use super::Notification;

/// Writes every notification to the log at info level
pub struct LogIntegration;

#[async_trait]
impl NotificationIntegration for LogIntegration {
    fn name(&self) -> &str {
        "log"
    }

    fn handles_topic(&self, _topic: &str) -> bool {
        true
    }

    fn is_enabled(&self) -> bool {
        true
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        tracing::info!(
            topic = %notification.topic,
            reference_id = %notification.reference_id,
            link = %notification.link,
            "{}: {}",
            notification.title,
            notification.message
        );
        Ok(())
    }
}
