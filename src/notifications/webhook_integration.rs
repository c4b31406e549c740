//! Webhook notification integration.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;

use super::integration::NotificationIntegration;
use super::Notification;
use crate::config::WebhookConfig;

/// Sends an HTTP POST to the configured endpoint for each notification.
pub struct WebhookIntegration {
    url: String,
    bearer_token: Option<String>,
    client: Client,
}

/// Webhook payload format.
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    topic: &'a str,
    /// ISO 8601 timestamp
    timestamp: String,
    notification: &'a Notification,
}

impl WebhookIntegration {
    pub fn new(config: &WebhookConfig) -> Self {
        let bearer_token = config.bearer_token_env.as_deref().and_then(|env_var| {
            match std::env::var(env_var) {
                Ok(token) if !token.is_empty() => Some(token),
                _ => {
                    tracing::warn!(
                        env_var,
                        "Bearer token environment variable is not set or empty"
                    );
                    None
                }
            }
        });

        Self {
            url: config.url.clone(),
            bearer_token,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl NotificationIntegration for WebhookIntegration {
    fn name(&self) -> &str {
        "webhook"
    }

    fn handles_topic(&self, _topic: &str) -> bool {
        true
    }

    fn is_enabled(&self) -> bool {
        !self.url.is_empty()
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        let payload = WebhookPayload {
            topic: &notification.topic,
            timestamp: Utc::now().to_rfc3339(),
            notification,
        };

        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            anyhow::bail!("webhook returned status {}", response.status());
        }

        tracing::debug!(
            topic = %notification.topic,
            status = %response.status(),
            "Webhook delivered"
        );
        Ok(())
    }
}
