// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI completion adapter for the Feedsense pipeline.
//!
//! This crate implements [`CompletionAdapter`] on top of the Chat
//! Completions API. One call is one HTTP request.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use feedsense_config::model::OpenAiConfig;
use feedsense_core::traits::{CompletionAdapter, PluginAdapter};
use feedsense_core::{
    AdapterType, CompletionRequest, CompletionResponse, FeedsenseError, HealthStatus, TokenUsage,
};
use secrecy::SecretString;
use tracing::info;

use crate::client::OpenAiClient;
use crate::types::{ApiMessage, ChatCompletionRequest};

/// OpenAI provider implementing [`CompletionAdapter`].
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    /// Creates a provider from the `[openai]` section and a resolved API key.
    pub fn new(config: &OpenAiConfig, api_key: &SecretString) -> Result<Self, FeedsenseError> {
        let client = OpenAiClient::new(
            api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(base_url = %config.base_url, "OpenAI provider initialized");
        Ok(Self { client })
    }

    /// Creates a provider with an existing client.
    pub fn with_client(client: OpenAiClient) -> Self {
        Self { client }
    }

    fn to_api_request(request: &CompletionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| ApiMessage {
                    role: m.role.to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, FeedsenseError> {
        // No request is made; a test completion would spend tokens.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CompletionAdapter for OpenAiProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, FeedsenseError> {
        let api_request = Self::to_api_request(&request);
        let response = self.client.complete_chat(&api_request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| FeedsenseError::provider("completion returned no choices"))?;
        let content = choice
            .message
            .content
            .ok_or_else(|| FeedsenseError::provider("completion returned no content"))?;

        Ok(CompletionResponse {
            id: response.id,
            content,
            model: response.model,
            finish_reason: choice.finish_reason,
            usage: response.usage.map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            }),
        })
    }
}
