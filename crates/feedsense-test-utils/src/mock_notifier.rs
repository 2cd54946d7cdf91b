// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification adapter that records what it was asked to post.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use feedsense_core::{AdapterType, FeedsenseError, HealthStatus, NotificationAdapter, PluginAdapter};

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent post fail. Attempts are still recorded.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn messages(&self) -> Vec<String> {
        self.messages.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for RecordingNotifier {
    fn name(&self) -> &str {
        "recording-notifier"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notification
    }

    async fn health_check(&self) -> Result<HealthStatus, FeedsenseError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl NotificationAdapter for RecordingNotifier {
    async fn post(&self, message: &str) -> Result<(), FeedsenseError> {
        self.messages.lock().await.push(message.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(FeedsenseError::Notification {
                message: "mock webhook unavailable".to_string(),
                source: None,
            });
        }
        Ok(())
    }
}
