// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Feedsense pipeline.

use thiserror::Error;

/// The primary error type used across all Feedsense adapter traits and core operations.
#[derive(Debug, Error)]
pub enum FeedsenseError {
    /// Configuration errors (invalid TOML, bad identifiers, unusable values).
    #[error("configuration error: {0}")]
    Config(String),

    /// A required secret could not be resolved from the secret provider.
    #[error("secret `{id}` unavailable: {message}")]
    Secret { id: String, message: String },

    /// Completion service errors (transport failure, non-success status, empty completion).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Source or output store errors (unreachable database, unreadable file, bad query).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The final batched append failed. The results were computed but not persisted.
    #[error("failed to persist {pending} computed results: {source}")]
    SinkWrite {
        pending: usize,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Notification sink errors. Never escalated past the orchestrator.
    #[error("notification error: {message}")]
    Notification {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FeedsenseError {
    /// Convenience constructor for provider errors without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps any error as a storage error.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }

    /// Returns true for errors that must abort a run before any row is processed.
    pub fn is_fatal_configuration(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Secret { .. })
    }
}
