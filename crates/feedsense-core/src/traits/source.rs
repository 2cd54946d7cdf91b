// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feedback source trait implementing incremental selection.

use async_trait::async_trait;

use crate::error::FeedsenseError;
use crate::traits::adapter::PluginAdapter;
use crate::types::FeedbackRow;

/// Source of feedback rows not yet present in the output store.
#[async_trait]
pub trait FeedbackSource: PluginAdapter {
    /// Returns, in source order, every row whose identity key is absent from
    /// the output store. Evaluated fresh on every call. A missing output
    /// store counts as empty. Nothing new is `Ok(vec![])`, not an error.
    async fn fetch_unprocessed(&self) -> Result<Vec<FeedbackRow>, FeedsenseError>;
}
