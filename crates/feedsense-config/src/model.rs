// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Feedsense pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Feedsense configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FeedsenseConfig {
    /// Run-level settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Prompt and retry settings for the classifier.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// OpenAI-compatible completion service settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// SQLite warehouse backend settings.
    #[serde(default)]
    pub warehouse: WarehouseConfig,

    /// Flat-file backend settings.
    #[serde(default)]
    pub csv: CsvConfig,

    /// Run summary notification settings.
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Secret provider settings.
    #[serde(default)]
    pub secrets: SecretsConfig,
}

/// Which source/sink pair a run reads from and appends to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// SQLite database with source and output tables.
    #[default]
    Sqlite,
    /// Input CSV file, output CSV file appended in place.
    Csv,
}

/// Run-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Storage backend for the run.
    #[serde(default)]
    pub backend: Backend,

    /// Process at most this many selected rows per run. `None` processes all of them.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            backend: Backend::default(),
            limit: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Classifier prompt and retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Model identifier sent with every completion request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Output token ceiling. Sized for a three-field JSON object.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Decoding temperature.
    #[serde(default)]
    pub temperature: f32,

    /// Total attempts per row, including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts, in seconds.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            max_attempts: default_max_attempts(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    60
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    2
}

/// OpenAI-compatible API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// Base URL; `/chat/completions` is appended.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_openai_timeout_secs")]
    pub timeout_secs: u64,

    /// Secret id of the API key in the configured secret provider.
    #[serde(default = "default_api_key_secret")]
    pub api_key_secret: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            timeout_secs: default_openai_timeout_secs(),
            api_key_secret: default_api_key_secret(),
        }
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_timeout_secs() -> u64 {
    30
}

fn default_api_key_secret() -> String {
    "openai-api-key".to_string()
}

/// SQLite warehouse configuration.
///
/// A `(dataset, table)` pair is stored as the SQLite table `<dataset>_<table>`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WarehouseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Dataset prefix shared by source and output tables.
    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// Table holding user feedback events.
    #[serde(default = "default_source_table")]
    pub source_table: String,

    /// Table the classified records are appended to.
    #[serde(default = "default_output_table")]
    pub output_table: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            dataset: default_dataset(),
            source_table: default_source_table(),
            output_table: default_output_table(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_local_dir()
        .map(|d| d.join("feedsense/warehouse.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("warehouse.db"))
        .display()
        .to_string()
}

fn default_dataset() -> String {
    "analytics".to_string()
}

fn default_source_table() -> String {
    "user_feedback_and_flags".to_string()
}

fn default_output_table() -> String {
    "feedback_sentiment_output".to_string()
}

/// Flat-file backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CsvConfig {
    /// Input CSV with a header row naming the feedback columns.
    #[serde(default = "default_csv_input")]
    pub input_path: String,

    /// Output CSV, appended to and used as the dedup reference.
    #[serde(default = "default_csv_output")]
    pub output_path: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            input_path: default_csv_input(),
            output_path: default_csv_output(),
        }
    }
}

fn default_csv_input() -> String {
    "user_feedback_and_flags.csv".to_string()
}

fn default_csv_output() -> String {
    "feedback_sentiment_output.csv".to_string()
}

/// Notification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotifyConfig {
    /// Secret id of the incoming-webhook URL. An empty secret disables notifications.
    #[serde(default = "default_webhook_secret")]
    pub webhook_secret: String,

    /// Webhook request timeout in seconds.
    #[serde(default = "default_notify_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_secret: default_webhook_secret(),
            timeout_secs: default_notify_timeout_secs(),
        }
    }
}

fn default_webhook_secret() -> String {
    "slack-webhook-url".to_string()
}

fn default_notify_timeout_secs() -> u64 {
    10
}

/// Where secrets are read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretBackend {
    /// Environment variables, `openai-api-key` -> `OPENAI_API_KEY`.
    #[default]
    Env,
    /// A TOML file of `secret-id = "value"` pairs.
    File,
}

/// Secret provider configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SecretsConfig {
    /// Which provider to use.
    #[serde(default)]
    pub provider: SecretBackend,

    /// Path to the secrets file when `provider = "file"`.
    #[serde(default)]
    pub file_path: Option<String>,
}
