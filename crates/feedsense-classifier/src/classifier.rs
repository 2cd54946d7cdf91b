// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The sentiment classifier client.

use std::sync::Arc;

use feedsense_config::model::ClassifierConfig;
use feedsense_core::{ChatMessage, CompletionAdapter, CompletionRequest};
use tracing::debug;

use crate::error::ClassifyError;
use crate::fence::strip_code_fence;
use crate::prompt::{SYSTEM_INSTRUCTION, build_prompt};
use crate::retry::RetryPolicy;

/// Request parameters that stay fixed for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl From<&ClassifierConfig> for ClassifierSettings {
    fn from(config: &ClassifierConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Sends one feedback pair to the completion service and returns its text.
///
/// Transport failures are retried by the [`RetryPolicy`]. The returned text
/// has any surrounding code fence removed but is otherwise unvalidated.
pub struct Classifier {
    completion: Arc<dyn CompletionAdapter>,
    settings: ClassifierSettings,
    policy: RetryPolicy,
}

impl Classifier {
    pub fn new(
        completion: Arc<dyn CompletionAdapter>,
        settings: ClassifierSettings,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            completion,
            settings,
            policy,
        }
    }

    /// Builds a classifier from the `[classifier]` section.
    pub fn from_config(completion: Arc<dyn CompletionAdapter>, config: &ClassifierConfig) -> Self {
        Self::new(completion, config.into(), config.into())
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// The exact request sent for a pair of texts.
    pub fn request_for(&self, system_message: &str, user_comment: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_INSTRUCTION),
                ChatMessage::user(build_prompt(system_message, user_comment)),
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }

    /// Classifies one pair, returning fence-stripped completion text.
    pub async fn classify(
        &self,
        system_message: &str,
        user_comment: &str,
    ) -> Result<String, ClassifyError> {
        let request = self.request_for(system_message, user_comment);
        let response = self
            .policy
            .run(|| self.completion.complete(request.clone()))
            .await?;

        debug!(
            provider = self.completion.name(),
            model = %response.model,
            finish_reason = response.finish_reason.as_deref().unwrap_or("none"),
            "completion received"
        );
        Ok(strip_code_fence(&response.content).to_string())
    }
}
