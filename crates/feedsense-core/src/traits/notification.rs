// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification adapter trait for run summaries.

use async_trait::async_trait;

use crate::error::FeedsenseError;
use crate::traits::adapter::PluginAdapter;

/// Best-effort message sink (chat webhook, pager, ...).
///
/// An unconfigured sink must return `Ok(())` without doing anything.
#[async_trait]
pub trait NotificationAdapter: PluginAdapter {
    /// Posts a plain-text message.
    async fn post(&self, message: &str) -> Result<(), FeedsenseError>;
}
