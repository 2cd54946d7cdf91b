// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion adapter for deterministic testing.
//!
//! Replies are popped from a FIFO queue. When the queue is empty a valid
//! neutral classification is returned. Prompts containing a registered
//! needle always fail with a provider error.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use feedsense_core::{
    AdapterType, CompletionAdapter, CompletionRequest, CompletionResponse, FeedsenseError,
    HealthStatus, PluginAdapter, TokenUsage,
};

use crate::fixtures::classification_json;

pub struct MockCompletion {
    responses: Arc<Mutex<VecDeque<String>>>,
    failing: Vec<String>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockCompletion {
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            failing: Vec::new(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every request whose prompt contains `needle` fails.
    pub fn fail_when_prompt_contains(mut self, needle: impl Into<String>) -> Self {
        self.failing.push(needle.into());
        self
    }

    pub async fn add_response(&self, text: String) {
        self.responses.lock().await.push_back(text);
    }

    /// Requests received so far, failed ones included.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    async fn next_response(&self) -> String {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| classification_json(0, "neutral", "response_quality"))
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockCompletion {
    fn name(&self) -> &str {
        "mock-completion"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, FeedsenseError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CompletionAdapter for MockCompletion {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, FeedsenseError> {
        let prompt = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let model = request.model.clone();
        let count = {
            let mut requests = self.requests.lock().await;
            requests.push(request);
            requests.len()
        };

        if let Some(needle) = self.failing.iter().find(|n| prompt.contains(n.as_str())) {
            return Err(FeedsenseError::provider(format!(
                "mock failure for prompt containing {needle:?}"
            )));
        }

        Ok(CompletionResponse {
            id: format!("mock-resp-{count}"),
            content: self.next_response().await,
            model,
            finish_reason: Some("stop".to_string()),
            usage: Some(TokenUsage {
                input_tokens: 40,
                output_tokens: 20,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedsense_core::ChatMessage;

    fn request(comment: &str) -> CompletionRequest {
        CompletionRequest {
            model: "test-model".to_string(),
            messages: vec![
                ChatMessage::system("json only"),
                ChatMessage::user(format!("User comment: {comment}")),
            ],
            temperature: 0.0,
            max_tokens: 60,
        }
    }

    #[tokio::test]
    async fn default_reply_is_valid_classification() {
        let mock = MockCompletion::new();
        let resp = mock.complete(request("fine")).await.unwrap();
        assert!(resp.content.contains("\"sentiment_type\":\"neutral\""));
        assert_eq!(resp.model, "test-model");
    }

    #[tokio::test]
    async fn queued_replies_returned_in_order() {
        let mock = MockCompletion::with_responses(vec!["first".into(), "second".into()]);
        assert_eq!(mock.complete(request("a")).await.unwrap().content, "first");
        assert_eq!(mock.complete(request("b")).await.unwrap().content, "second");
    }

    #[tokio::test]
    async fn needle_forces_failure_and_is_recorded() {
        let mock = MockCompletion::new().fail_when_prompt_contains("broken");
        assert!(mock.complete(request("this is broken")).await.is_err());
        assert!(mock.complete(request("fine")).await.is_ok());
        assert_eq!(mock.requests().await.len(), 2);
    }
}
