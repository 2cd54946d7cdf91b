// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sentiment classification for feedback rows.
//!
//! [`Classifier`] turns a (system message, user comment) pair into completion
//! text with bounded retries and code-fence removal. [`parse_response`]
//! validates that text into a [`feedsense_core::Classification`].

pub mod classifier;
pub mod error;
pub mod fence;
pub mod parser;
pub mod prompt;
pub mod retry;

pub use classifier::{Classifier, ClassifierSettings};
pub use error::{ClassifyError, ParseError};
pub use fence::strip_code_fence;
pub use parser::parse_response;
pub use prompt::{SYSTEM_INSTRUCTION, build_prompt};
pub use retry::{BackoffPolicy, RetryPolicy};
