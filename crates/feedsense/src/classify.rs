// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `feedsense classify` command implementation.

use std::sync::Arc;

use feedsense_classifier::{ClassifyError, Classifier, parse_response};
use feedsense_config::FeedsenseConfig;
use feedsense_core::FeedsenseError;
use feedsense_openai::OpenAiProvider;
use feedsense_secrets::{provider_from_config, resolve_api_key};

/// Classifies one pair with the configured model and prints the validated JSON.
pub async fn run_classify(
    config: &FeedsenseConfig,
    system_message: &str,
    comment: &str,
) -> Result<(), FeedsenseError> {
    let provider = provider_from_config(&config.secrets)?;
    let api_key = resolve_api_key(config, provider.as_ref())?;
    let completion = Arc::new(OpenAiProvider::new(&config.openai, &api_key)?);
    let classifier = Classifier::from_config(completion, &config.classifier);

    let raw = classifier
        .classify(system_message, comment)
        .await
        .map_err(|ClassifyError::RetriesExhausted { last_error, .. }| last_error)?;
    let classification = parse_response(&raw).map_err(|e| FeedsenseError::Provider {
        message: format!("invalid classification: {e}"),
        source: Some(Box::new(e)),
    })?;

    let json = serde_json::to_string_pretty(&classification)
        .map_err(|e| FeedsenseError::Internal(format!("failed to render classification: {e}")))?;
    println!("{json}");
    Ok(())
}
