// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the collaborators of a pipeline run.
//!
//! Every async adapter extends the [`PluginAdapter`] base trait and uses
//! `#[async_trait]` so the orchestrator can hold them as trait objects.

pub mod adapter;
pub mod completion;
pub mod notification;
pub mod secrets;
pub mod sink;
pub mod source;

pub use adapter::PluginAdapter;
pub use completion::CompletionAdapter;
pub use notification::NotificationAdapter;
pub use secrets::SecretProvider;
pub use sink::ResultSink;
pub use source::FeedbackSource;
