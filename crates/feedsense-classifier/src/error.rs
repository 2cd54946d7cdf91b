// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-row failure types. Neither aborts a run.

use feedsense_core::FeedsenseError;
use thiserror::Error;

/// The completion service could not produce text for a row.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Every attempt allowed by the retry policy failed.
    #[error("completion failed after {attempts} attempt(s): {last_error}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last_error: FeedsenseError,
    },
}

/// Completion text that is not a valid classification.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The text is not a single JSON value.
    #[error("response is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    /// The JSON value does not satisfy the classification schema.
    #[error("field `{field}` {reason}")]
    Schema { field: &'static str, reason: String },
}

impl ParseError {
    pub(crate) fn schema(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Schema {
            field,
            reason: reason.into(),
        }
    }
}
