// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Incoming-webhook notification adapter.
//!
//! Posts `{"text": "..."}` to a chat webhook URL. An empty URL disables the
//! adapter: posts succeed without sending anything.

use std::time::Duration;

use async_trait::async_trait;
use feedsense_config::model::NotifyConfig;
use feedsense_core::{AdapterType, FeedsenseError, HealthStatus, NotificationAdapter, PluginAdapter};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

/// Webhook notifier implementing [`NotificationAdapter`].
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: SecretString,
}

impl WebhookNotifier {
    pub fn new(url: SecretString, timeout: Duration) -> Result<Self, FeedsenseError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedsenseError::Notification {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client, url })
    }

    /// Creates a notifier from the `[notify]` section and the resolved URL.
    pub fn from_config(config: &NotifyConfig, url: SecretString) -> Result<Self, FeedsenseError> {
        Self::new(url, Duration::from_secs(config.timeout_secs))
    }

    pub fn is_enabled(&self) -> bool {
        !self.url.expose_secret().trim().is_empty()
    }
}

#[async_trait]
impl PluginAdapter for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notification
    }

    async fn health_check(&self) -> Result<HealthStatus, FeedsenseError> {
        if self.is_enabled() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Degraded("disabled".to_string()))
        }
    }
}

#[async_trait]
impl NotificationAdapter for WebhookNotifier {
    async fn post(&self, message: &str) -> Result<(), FeedsenseError> {
        if !self.is_enabled() {
            debug!("webhook disabled, notification skipped");
            return Ok(());
        }

        // The URL is the credential; errors must not echo it.
        let response = self
            .client
            .post(self.url.expose_secret().trim())
            .json(&WebhookPayload { text: message })
            .send()
            .await
            .map_err(|e| FeedsenseError::Notification {
                message: format!("webhook request failed: {}", e.without_url()),
                source: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedsenseError::Notification {
                message: format!("webhook returned {status}: {body}"),
                source: None,
            });
        }
        debug!(status = %status, "notification delivered");
        Ok(())
    }
}
