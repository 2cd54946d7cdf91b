// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory feedback source and append-only result sink.
//!
//! Selection runs the same anti-join as the real backends, against the
//! records this store has accepted.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use feedsense_core::{
    AdapterType, FeedbackRow, FeedbackSource, FeedsenseError, HealthStatus, IdentityKey,
    OutputRecord, PluginAdapter, ResultSink, select_unprocessed,
};

#[derive(Default)]
pub struct MemoryStore {
    rows: Arc<Mutex<Vec<FeedbackRow>>>,
    output: Arc<Mutex<Vec<OutputRecord>>>,
    append_calls: AtomicUsize,
    fail_appends: AtomicBool,
}

impl MemoryStore {
    pub fn new(rows: Vec<FeedbackRow>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
            ..Self::default()
        }
    }

    /// Adds a row to the source, as new feedback arriving between runs.
    pub async fn push_row(&self, row: FeedbackRow) {
        self.rows.lock().await.push(row);
    }

    /// Everything appended so far, in write order.
    pub async fn output(&self) -> Vec<OutputRecord> {
        self.output.lock().await.clone()
    }

    /// Number of `append` calls, failed ones included.
    pub fn append_calls(&self) -> usize {
        self.append_calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent append fail without storing anything.
    pub fn set_failing(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Source
    }

    async fn health_check(&self) -> Result<HealthStatus, FeedsenseError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl FeedbackSource for MemoryStore {
    async fn fetch_unprocessed(&self) -> Result<Vec<FeedbackRow>, FeedsenseError> {
        let processed: HashSet<IdentityKey> = self
            .output
            .lock()
            .await
            .iter()
            .map(OutputRecord::identity_key)
            .collect();
        let rows = self.rows.lock().await.clone();
        Ok(select_unprocessed(rows, &processed))
    }
}

#[async_trait]
impl ResultSink for MemoryStore {
    async fn append(&self, records: &[OutputRecord]) -> Result<(), FeedsenseError> {
        self.append_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(FeedsenseError::storage("mock sink rejected the batch"));
        }
        self.output.lock().await.extend_from_slice(records);
        Ok(())
    }
}
