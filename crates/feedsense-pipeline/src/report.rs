// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run outcomes and counters.

use std::fmt;

use feedsense_classifier::{ClassifyError, ParseError};
use thiserror::Error;

/// How a run that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The selector found no unprocessed rows.
    NothingToDo,
    /// Rows were selected but none produced a valid classification.
    NoValidResponses,
    /// This many records were appended in one batch.
    Wrote(usize),
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingToDo => f.write_str("no new rows to process"),
            Self::NoValidResponses => f.write_str("no valid responses to write"),
            Self::Wrote(n) => write!(f, "wrote {n} rows"),
        }
    }
}

/// Why a single row was skipped.
#[derive(Debug, Error)]
pub enum RowFailure {
    #[error("system message or user comment is blank")]
    BlankText,
    #[error(transparent)]
    Classify(#[from] ClassifyError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Summary of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub run_id: String,
    pub outcome: RunOutcome,
    /// Rows returned by the selector, before any limit.
    pub selected: usize,
    /// Rows actually sent through classification.
    pub attempted: usize,
    pub skipped_blank: usize,
    pub classify_failed: usize,
    pub parse_failed: usize,
    /// Whether a notification was delivered (or skipped by a disabled notifier).
    pub notified: bool,
}

impl RunReport {
    pub(crate) fn new(run_id: String) -> Self {
        Self {
            run_id,
            outcome: RunOutcome::NothingToDo,
            selected: 0,
            attempted: 0,
            skipped_blank: 0,
            classify_failed: 0,
            parse_failed: 0,
            notified: false,
        }
    }

    pub fn written(&self) -> usize {
        match self.outcome {
            RunOutcome::Wrote(n) => n,
            _ => 0,
        }
    }

    pub fn failed(&self) -> usize {
        self.skipped_blank + self.classify_failed + self.parse_failed
    }

    pub(crate) fn record_failure(&mut self, failure: &RowFailure) {
        match failure {
            RowFailure::BlankText => self.skipped_blank += 1,
            RowFailure::Classify(_) => self.classify_failed += 1,
            RowFailure::Parse(_) => self.parse_failed += 1,
        }
    }
}
