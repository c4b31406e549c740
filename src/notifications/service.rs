//! Central notification service that dispatches to all integrations.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::integration::NotificationIntegration;
use super::log_integration::LogIntegration;
use super::webhook_integration::WebhookIntegration;
use super::{Notification, Notifier};
use crate::config::NotificationsConfig;

/// Central notification dispatcher.
///
/// Delivery failures of individual integrations are logged and never
/// propagated; a notification is best-effort once the timesheet exists.
pub struct NotificationService {
    integrations: Vec<Arc<dyn NotificationIntegration>>,
    enabled: bool,
}

impl NotificationService {
    pub fn from_config(config: &NotificationsConfig) -> Self {
        let mut integrations: Vec<Arc<dyn NotificationIntegration>> =
            vec![Arc::new(LogIntegration)];

        if let Some(webhook) = &config.webhook {
            if !webhook.url.is_empty() {
                integrations.push(Arc::new(WebhookIntegration::new(webhook)));
            }
        }

        Self {
            integrations,
            enabled: config.enabled,
        }
    }

    /// Create a disabled notification service.
    pub fn disabled() -> Self {
        Self {
            integrations: Vec::new(),
            enabled: false,
        }
    }

    pub fn with_integrations(integrations: Vec<Arc<dyn NotificationIntegration>>) -> Self {
        Self {
            integrations,
            enabled: true,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn integration_count(&self) -> usize {
        self.integrations.len()
    }
}

#[async_trait]
impl Notifier for NotificationService {
    async fn send_notification(&self, notification: Notification) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        for integration in &self.integrations {
            if integration.is_enabled() && integration.handles_topic(&notification.topic) {
                if let Err(e) = integration.send(&notification).await {
                    tracing::warn!(
                        integration = %integration.name(),
                        topic = %notification.topic,
                        error = %e,
                        "Notification delivery failed"
                    );
                }
            }
        }

        Ok(())
    }
}
