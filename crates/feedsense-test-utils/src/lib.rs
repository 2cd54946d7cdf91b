// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Feedsense integration tests.
//!
//! Provides in-memory adapters and a harness that wires them into a
//! [`Pipeline`](feedsense_pipeline::Pipeline) without network or disk.
//!
//! # Components
//!
//! - [`MockCompletion`] - Completion adapter with scripted replies and forced failures
//! - [`MemoryStore`] - Feedback source and result sink over in-memory rows
//! - [`RecordingNotifier`] - Notification adapter that captures messages
//! - [`TestHarness`] - Builder for a fully wired pipeline

pub mod fixtures;
pub mod harness;
pub mod memory_store;
pub mod mock_completion;
pub mod mock_notifier;

pub use fixtures::{classification_json, feedback_row};
pub use harness::{TestHarness, TestHarnessBuilder};
pub use memory_store::MemoryStore;
pub use mock_completion::MockCompletion;
pub use mock_notifier::RecordingNotifier;
