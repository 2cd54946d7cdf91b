// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestration of one incremental sentiment run.
//!
//! A [`Pipeline`] selects unprocessed rows from a
//! [`FeedbackSource`](feedsense_core::FeedbackSource), classifies them one by
//! one, appends every valid result to a
//! [`ResultSink`](feedsense_core::ResultSink) in a single batch and posts a
//! summary through a [`NotificationAdapter`](feedsense_core::NotificationAdapter).

pub mod pipeline;
pub mod report;

pub use pipeline::{Pipeline, summary_message};
pub use report::{RowFailure, RunOutcome, RunReport};
