// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for pipeline runs.
//!
//! `TestHarness` wires a [`Pipeline`] to in-memory adapters and keeps
//! handles to each of them, so tests can run the pipeline repeatedly and
//! inspect what was requested, written and posted.

use std::sync::Arc;
use std::time::Duration;

use feedsense_classifier::{Classifier, ClassifierSettings, RetryPolicy};
use feedsense_core::{FeedbackRow, FeedsenseError};
use feedsense_pipeline::{Pipeline, RunReport};

use crate::memory_store::MemoryStore;
use crate::mock_completion::MockCompletion;
use crate::mock_notifier::RecordingNotifier;

/// Builder for a harness with configurable rows and failures.
pub struct TestHarnessBuilder {
    rows: Vec<FeedbackRow>,
    responses: Vec<String>,
    failing_comments: Vec<String>,
    max_attempts: u32,
    limit: Option<usize>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            responses: Vec::new(),
            failing_comments: Vec::new(),
            max_attempts: 3,
            limit: None,
        }
    }

    pub fn with_rows(mut self, rows: Vec<FeedbackRow>) -> Self {
        self.rows = rows;
        self
    }

    /// Completion replies, consumed in request order.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Rows whose comment contains `needle` fail on every attempt.
    pub fn with_failing_comment(mut self, needle: impl Into<String>) -> Self {
        self.failing_comments.push(needle.into());
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(self) -> TestHarness {
        let completion = self.failing_comments.into_iter().fold(
            MockCompletion::with_responses(self.responses),
            |mock, needle| mock.fail_when_prompt_contains(needle),
        );
        let completion = Arc::new(completion);
        let store = Arc::new(MemoryStore::new(self.rows));
        let notifier = Arc::new(RecordingNotifier::new());

        let classifier = Classifier::new(
            completion.clone(),
            ClassifierSettings {
                model: "test-model".to_string(),
                max_tokens: 60,
                temperature: 0.0,
            },
            RetryPolicy::new(self.max_attempts, Duration::ZERO),
        );
        let pipeline = Pipeline::new(store.clone(), store.clone(), classifier, notifier.clone())
            .with_limit(self.limit);

        TestHarness {
            completion,
            store,
            notifier,
            pipeline,
        }
    }
}

/// A pipeline over mock adapters plus handles to inspect them.
pub struct TestHarness {
    pub completion: Arc<MockCompletion>,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pipeline: Pipeline,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Executes one pipeline run.
    pub async fn run(&self) -> Result<RunReport, FeedsenseError> {
        self.pipeline.run().await
    }
}
