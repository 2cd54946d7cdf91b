// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Result sink trait for the output store.

use async_trait::async_trait;

use crate::error::FeedsenseError;
use crate::traits::adapter::PluginAdapter;
use crate::types::OutputRecord;

/// Append-only destination for classified records.
#[async_trait]
pub trait ResultSink: PluginAdapter {
    /// Appends the whole batch in one operation.
    ///
    /// Must never overwrite or delete existing rows, must create the store
    /// on first write, and must not leave part of the batch behind on failure.
    async fn append(&self, records: &[OutputRecord]) -> Result<(), FeedsenseError>;
}
