// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion adapter trait for LLM chat-completion services.

use async_trait::async_trait;

use crate::error::FeedsenseError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionRequest, CompletionResponse};

/// Adapter for an opaque text-completion service.
///
/// Implementations perform exactly one request per call. Retrying is the
/// caller's decision. Transport and service failures are reported as
/// [`FeedsenseError::Provider`]; the content of a successful completion is
/// never validated here.
#[async_trait]
pub trait CompletionAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, FeedsenseError>;
}
