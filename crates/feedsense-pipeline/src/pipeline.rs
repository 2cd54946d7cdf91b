// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The run state machine: select, classify, accumulate, write, notify.
//!
//! Rows are awaited one at a time in source order. Nothing is written until
//! every selected row has been attempted, and then the whole batch goes to
//! the sink in a single `append`.

use std::sync::Arc;

use chrono::Utc;
use feedsense_classifier::{Classifier, parse_response};
use feedsense_core::{
    FeedbackRow, FeedbackSource, FeedsenseError, NotificationAdapter, OutputRecord, ResultSink,
    SentimentResult,
};
use tracing::{debug, error, info, warn};

use crate::report::{RowFailure, RunOutcome, RunReport};

/// Message posted after a successful write.
pub fn summary_message(count: usize) -> String {
    format!("LLM pipeline processed {count} new rows.")
}

/// One incremental classification run over injected collaborators.
pub struct Pipeline {
    source: Arc<dyn FeedbackSource>,
    sink: Arc<dyn ResultSink>,
    classifier: Classifier,
    notifier: Arc<dyn NotificationAdapter>,
    limit: Option<usize>,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn FeedbackSource>,
        sink: Arc<dyn ResultSink>,
        classifier: Classifier,
        notifier: Arc<dyn NotificationAdapter>,
    ) -> Self {
        Self {
            source,
            sink,
            classifier,
            notifier,
            limit: None,
        }
    }

    /// Caps how many selected rows are processed. Unprocessed rows stay
    /// selectable for the next run.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Executes one run.
    ///
    /// Per-row failures are counted and never abort the run. Source and sink
    /// failures are returned as errors; a notification failure is logged and
    /// swallowed.
    pub async fn run(&self) -> Result<RunReport, FeedsenseError> {
        let mut report = RunReport::new(uuid::Uuid::new_v4().to_string());
        self.execute(&mut report).await?;
        info!(
            run_id = %report.run_id,
            outcome = %report.outcome,
            selected = report.selected,
            attempted = report.attempted,
            written = report.written(),
            skipped_blank = report.skipped_blank,
            classify_failed = report.classify_failed,
            parse_failed = report.parse_failed,
            notified = report.notified,
            "run finished"
        );
        Ok(report)
    }

    async fn execute(&self, report: &mut RunReport) -> Result<(), FeedsenseError> {
        let run_id = report.run_id.clone();

        let mut rows = self.source.fetch_unprocessed().await?;
        report.selected = rows.len();
        if rows.is_empty() {
            info!(run_id = %run_id, source = self.source.name(), "no new rows to process");
            return Ok(());
        }
        if let Some(limit) = self.limit
            && rows.len() > limit
        {
            info!(run_id = %run_id, selected = rows.len(), limit, "processing first rows only");
            rows.truncate(limit);
        }
        report.attempted = rows.len();
        info!(run_id = %run_id, rows = rows.len(), "processing unprocessed rows");

        let mut batch = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            let identity = row.identity_key();
            match self.process_row(row).await {
                Ok(record) => batch.push(record),
                Err(failure) => {
                    warn!(
                        run_id = %run_id,
                        row = index,
                        user_id = %identity.user_id,
                        message_id = %identity.message_id,
                        error = %failure,
                        "row skipped"
                    );
                    report.record_failure(&failure);
                }
            }
        }

        if batch.is_empty() {
            report.outcome = RunOutcome::NoValidResponses;
            warn!(run_id = %run_id, failed = report.failed(), "no valid responses to write");
            return Ok(());
        }

        let pending = batch.len();
        if let Err(e) = self.sink.append(&batch).await {
            error!(run_id = %run_id, pending, error = %e, "batch write failed");
            return Err(FeedsenseError::SinkWrite {
                pending,
                source: Box::new(e),
            });
        }
        report.outcome = RunOutcome::Wrote(pending);
        info!(run_id = %run_id, written = pending, sink = self.sink.name(), "batch written");

        match self.notifier.post(&summary_message(pending)).await {
            Ok(()) => report.notified = true,
            Err(e) => warn!(run_id = %run_id, error = %e, "notification failed"),
        }
        Ok(())
    }

    async fn process_row(&self, row: FeedbackRow) -> Result<OutputRecord, RowFailure> {
        if !row.has_classifiable_text() {
            return Err(RowFailure::BlankText);
        }
        let raw = self
            .classifier
            .classify(&row.system_message, &row.user_comment)
            .await?;
        let classification = parse_response(&raw).inspect_err(|_| {
            debug!(raw = %raw, "unparseable completion");
        })?;
        Ok(OutputRecord::new(
            row,
            SentimentResult::new(classification, Utc::now()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_message_text() {
        assert_eq!(summary_message(3), "LLM pipeline processed 3 new rows.");
        assert_eq!(summary_message(1), "LLM pipeline processed 1 new rows.");
    }
}
