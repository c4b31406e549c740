//! Notification integration trait definition.

use anyhow::Result;
use async_trait::async_trait;

use super::Notification;

/// Trait for notification integrations.
///
/// Each integration (log, webhook) implements this trait to receive
/// notifications from the `NotificationService`.
#[async_trait]
pub trait NotificationIntegration: Send + Sync {
    /// Integration name (for logging)
    fn name(&self) -> &str;

    /// Check if this integration handles the given topic.
    fn handles_topic(&self, topic: &str) -> bool;

    fn is_enabled(&self) -> bool;

    /// Deliver a notification.
    async fn send(&self, notification: &Notification) -> Result<()>;
}
