// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde attributes cannot express: SQL
//! identifiers, retry bounds, temperature range, and non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::{Backend, FeedsenseConfig, SecretBackend};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &FeedsenseConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    macro_rules! fail {
        ($message:expr) => {
            errors.push(ConfigError::Validation { message: $message })
        };
    }

    if !LOG_LEVELS.contains(&config.pipeline.log_level.as_str()) {
        fail!(format!(
            "pipeline.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.pipeline.log_level
        ));
    }

    if config.pipeline.limit == Some(0) {
        fail!("pipeline.limit must be at least 1 when set".to_string());
    }

    let classifier = &config.classifier;
    if classifier.model.trim().is_empty() {
        fail!("classifier.model must not be empty".to_string());
    }
    if classifier.max_tokens == 0 {
        fail!("classifier.max_tokens must be at least 1".to_string());
    }
    if !(0.0..=2.0).contains(&classifier.temperature) {
        fail!(format!(
            "classifier.temperature must be within 0.0..=2.0, got {}",
            classifier.temperature
        ));
    }
    if classifier.max_attempts == 0 {
        fail!("classifier.max_attempts must be at least 1".to_string());
    }

    if !config.openai.base_url.starts_with("http://")
        && !config.openai.base_url.starts_with("https://")
    {
        fail!(format!(
            "openai.base_url must be an http(s) URL, got `{}`",
            config.openai.base_url
        ));
    }
    if config.openai.timeout_secs == 0 {
        fail!("openai.timeout_secs must be at least 1".to_string());
    }
    if config.openai.api_key_secret.trim().is_empty() {
        fail!("openai.api_key_secret must not be empty".to_string());
    }
    if config.notify.webhook_secret.trim().is_empty() {
        fail!("notify.webhook_secret must not be empty".to_string());
    }

    errors.extend(backend_errors(config, config.pipeline.backend));

    if config.secrets.provider == SecretBackend::File
        && config
            .secrets
            .file_path
            .as_deref()
            .is_none_or(|p| p.trim().is_empty())
    {
        fail!("secrets.file_path is required when secrets.provider = \"file\"".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the sections a run on `backend` reads.
///
/// [`validate_config`] checks the configured backend; a caller overriding the
/// backend at run time checks the override with this.
pub fn validate_backend(config: &FeedsenseConfig, backend: Backend) -> Result<(), Vec<ConfigError>> {
    let errors = backend_errors(config, backend);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn backend_errors(config: &FeedsenseConfig, backend: Backend) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    match backend {
        Backend::Sqlite => {
            let warehouse = &config.warehouse;
            if warehouse.database_path.trim().is_empty() {
                fail("warehouse.database_path must not be empty".to_string());
            }
            for (key, value) in [
                ("warehouse.dataset", &warehouse.dataset),
                ("warehouse.source_table", &warehouse.source_table),
                ("warehouse.output_table", &warehouse.output_table),
            ] {
                if !is_sql_identifier(value) {
                    fail(format!(
                        "{key} `{value}` must start with a letter or underscore and contain only letters, digits, and underscores"
                    ));
                }
            }
            if warehouse.source_table == warehouse.output_table {
                fail("warehouse.source_table and warehouse.output_table must differ".to_string());
            }
        }
        Backend::Csv => {
            if config.csv.input_path.trim().is_empty() {
                fail("csv.input_path must not be empty".to_string());
            }
            if config.csv.output_path.trim().is_empty() {
                fail("csv.output_path must not be empty".to_string());
            }
            if config.csv.input_path == config.csv.output_path {
                fail("csv.input_path and csv.output_path must differ".to_string());
            }
        }
    }

    errors
}

/// `[A-Za-z_][A-Za-z0-9_]*`. Table names are spliced into SQL, so nothing else is allowed.
pub fn is_sql_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = FeedsenseConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn sql_identifier_rules() {
        assert!(is_sql_identifier("feedback_sentiment_output"));
        assert!(is_sql_identifier("_staging2"));
        assert!(!is_sql_identifier(""));
        assert!(!is_sql_identifier("2024_output"));
        assert!(!is_sql_identifier("out\"; DROP TABLE x; --"));
        assert!(!is_sql_identifier("my-table"));
    }

    #[test]
    fn injected_table_name_fails_validation() {
        let mut config = FeedsenseConfig::default();
        config.warehouse.output_table = "out; DROP TABLE feedback".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "warehouse.output_table"));
    }

    #[test]
    fn zero_attempts_fails_validation() {
        let mut config = FeedsenseConfig::default();
        config.classifier.max_attempts = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "max_attempts"));
    }

    #[test]
    fn temperature_out_of_range_fails_validation() {
        let mut config = FeedsenseConfig::default();
        config.classifier.temperature = 3.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "temperature"));
    }

    #[test]
    fn zero_limit_fails_validation() {
        let mut config = FeedsenseConfig::default();
        config.pipeline.limit = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "pipeline.limit"));
    }

    #[test]
    fn csv_paths_only_checked_for_csv_backend() {
        let mut config = FeedsenseConfig::default();
        config.csv.input_path = String::new();
        assert!(validate_config(&config).is_ok());

        config.pipeline.backend = Backend::Csv;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "csv.input_path"));
    }

    #[test]
    fn overridden_backend_is_validated_on_its_own() {
        let mut config = FeedsenseConfig::default();
        config.csv.output_path = config.csv.input_path.clone();
        assert!(validate_config(&config).is_ok());
        assert!(validate_backend(&config, Backend::Sqlite).is_ok());

        let errors = validate_backend(&config, Backend::Csv).unwrap_err();
        assert!(has_error(&errors, "csv.input_path and csv.output_path must differ"));
    }

    #[test]
    fn file_secrets_require_path() {
        let mut config = FeedsenseConfig::default();
        config.secrets.provider = SecretBackend::File;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "secrets.file_path"));

        config.secrets.file_path = Some("/run/secrets/feedsense.toml".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = FeedsenseConfig::default();
        config.pipeline.log_level = "loud".to_string();
        config.classifier.max_tokens = 0;
        config.openai.base_url = "api.openai.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
