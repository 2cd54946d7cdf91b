// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Feedsense configuration system.

use feedsense_config::diagnostic::ConfigError;
use feedsense_config::model::{Backend, FeedsenseConfig, SecretBackend};
use feedsense_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known sections deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[pipeline]
log_level = "debug"
backend = "csv"
limit = 20

[classifier]
model = "gpt-4o-mini"
max_tokens = 80
temperature = 0.0
max_attempts = 4
retry_delay_secs = 1

[openai]
base_url = "http://localhost:8080/v1"
timeout_secs = 5
api_key_secret = "llm-key"

[warehouse]
database_path = "/tmp/warehouse.db"
dataset = "prod"
source_table = "feedback"
output_table = "feedback_scored"

[csv]
input_path = "in.csv"
output_path = "out.csv"

[notify]
webhook_secret = "ops-webhook"
timeout_secs = 3

[secrets]
provider = "file"
file_path = "/run/secrets/feedsense.toml"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.pipeline.log_level, "debug");
    assert_eq!(config.pipeline.backend, Backend::Csv);
    assert_eq!(config.pipeline.limit, Some(20));
    assert_eq!(config.classifier.model, "gpt-4o-mini");
    assert_eq!(config.classifier.max_tokens, 80);
    assert_eq!(config.classifier.max_attempts, 4);
    assert_eq!(config.classifier.retry_delay_secs, 1);
    assert_eq!(config.openai.base_url, "http://localhost:8080/v1");
    assert_eq!(config.openai.api_key_secret, "llm-key");
    assert_eq!(config.warehouse.dataset, "prod");
    assert_eq!(config.warehouse.output_table, "feedback_scored");
    assert_eq!(config.csv.output_path, "out.csv");
    assert_eq!(config.notify.webhook_secret, "ops-webhook");
    assert_eq!(config.secrets.provider, SecretBackend::File);
}

/// Empty TOML yields the documented defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults are valid");
    assert_eq!(config.pipeline.backend, Backend::Sqlite);
    assert_eq!(config.pipeline.limit, None);
    assert_eq!(config.classifier.model, "gpt-4o");
    assert_eq!(config.classifier.max_tokens, 60);
    assert_eq!(config.classifier.temperature, 0.0);
    assert_eq!(config.classifier.max_attempts, 3);
    assert_eq!(config.classifier.retry_delay_secs, 2);
    assert_eq!(config.openai.api_key_secret, "openai-api-key");
    assert_eq!(config.notify.webhook_secret, "slack-webhook-url");
    assert_eq!(config.warehouse.source_table, "user_feedback_and_flags");
    assert_eq!(config.warehouse.output_table, "feedback_sentiment_output");
    assert_eq!(config.secrets.provider, SecretBackend::Env);
}

/// Unknown key in a section is rejected with a suggestion.
#[test]
fn unknown_key_produces_suggestion() {
    let toml = r#"
[classifier]
max_attemps = 5
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key, suggestion, ..
            } => Some((key.clone(), suggestion.clone())),
            _ => None,
        })
        .expect("should produce UnknownKey");
    assert_eq!(unknown.0, "max_attemps");
    assert_eq!(unknown.1.as_deref(), Some("max_attempts"));
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[bigquery]
project_id = "x"
"#;
    let err = load_config_from_str(toml).expect_err("should reject unknown section");
    assert!(err.to_string().contains("bigquery"), "got: {err}");
}

/// Wrong value type maps to an InvalidType diagnostic.
#[test]
fn wrong_type_produces_invalid_type() {
    let toml = r#"
[classifier]
max_attempts = "three"
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject string");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("max_attempts"))),
        "got: {errors:?}"
    );
}

/// Unknown backend name maps to an InvalidValue diagnostic.
#[test]
fn unknown_backend_is_rejected() {
    let toml = r#"
[pipeline]
backend = "bigquery"
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject backend");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidValue { detail, .. } if detail.contains("bigquery"))),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after successful deserialization.
#[test]
fn validation_runs_after_load() {
    let toml = r#"
[warehouse]
output_table = "user_feedback_and_flags"
"#;
    let errors = load_and_validate_str(toml).expect_err("source and output must differ");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("must differ"))
    ));
}

/// The default config round-trips through TOML.
#[test]
fn default_config_serializes_to_toml() {
    let rendered = toml::to_string(&FeedsenseConfig::default()).expect("serializes");
    let reparsed = load_config_from_str(&rendered).expect("reparses");
    assert_eq!(reparsed.classifier.max_attempts, 3);
    assert_eq!(reparsed.pipeline.backend, Backend::Sqlite);
}
