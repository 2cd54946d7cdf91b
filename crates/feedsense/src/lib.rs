// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feedsense - incremental LLM sentiment classification of user feedback.
//!
//! Wires the configured backend, completion service and notifier into a
//! [`Pipeline`](feedsense_pipeline::Pipeline). The `feedsense` binary is a
//! thin CLI over [`build_adapters`].

pub mod wiring;

pub use wiring::{Adapters, build_adapters};
