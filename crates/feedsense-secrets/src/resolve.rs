// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup secret resolution.
//!
//! Every secret a run needs is fetched before the first row is selected, so a
//! missing credential aborts the run without touching the stores.

use std::path::Path;

use feedsense_config::model::{SecretBackend, SecretsConfig};
use feedsense_config::FeedsenseConfig;
use feedsense_core::{FeedsenseError, SecretProvider};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use crate::env::EnvSecretProvider;
use crate::file::FileSecretProvider;

/// The secrets one run needs.
#[derive(Debug)]
pub struct ResolvedSecrets {
    /// Completion service credential. Never empty.
    pub openai_api_key: SecretString,
    /// Incoming-webhook URL. Empty means notifications are disabled.
    pub webhook_url: SecretString,
}

impl ResolvedSecrets {
    pub fn notifications_enabled(&self) -> bool {
        !self.webhook_url.expose_secret().trim().is_empty()
    }
}

/// Builds the secret provider selected in `[secrets]`.
pub fn provider_from_config(
    config: &SecretsConfig,
) -> Result<Box<dyn SecretProvider>, FeedsenseError> {
    match config.provider {
        SecretBackend::Env => Ok(Box::new(EnvSecretProvider::new())),
        SecretBackend::File => {
            let path = config.file_path.as_deref().ok_or_else(|| {
                FeedsenseError::Config("secrets.file_path is required for the file provider".into())
            })?;
            Ok(Box::new(FileSecretProvider::open(Path::new(path))?))
        }
    }
}

/// Fetches the completion API key. A missing or blank key is fatal.
pub fn resolve_api_key(
    config: &FeedsenseConfig,
    provider: &dyn SecretProvider,
) -> Result<SecretString, FeedsenseError> {
    let key_id = &config.openai.api_key_secret;
    let api_key = provider.get_secret(key_id)?;
    if api_key.expose_secret().trim().is_empty() {
        return Err(FeedsenseError::Secret {
            id: key_id.clone(),
            message: "secret is empty".to_string(),
        });
    }
    debug!(
        provider = provider.name(),
        id = %key_id,
        key = %mask_secret(api_key.expose_secret()),
        "completion API key resolved"
    );
    Ok(api_key)
}

/// Fetches the API key and the webhook URL.
///
/// A missing or empty API key is fatal. A missing webhook secret is fatal
/// too; it must be set to the empty string to disable notifications.
pub fn resolve_secrets(
    config: &FeedsenseConfig,
    provider: &dyn SecretProvider,
) -> Result<ResolvedSecrets, FeedsenseError> {
    let openai_api_key = resolve_api_key(config, provider)?;

    let webhook_url = provider.get_secret(&config.notify.webhook_secret)?;
    let resolved = ResolvedSecrets {
        openai_api_key,
        webhook_url,
    };
    if !resolved.notifications_enabled() {
        info!(
            id = %config.notify.webhook_secret,
            "webhook secret is empty, notifications disabled"
        );
    }
    Ok(resolved)
}

/// Mask a secret for display: first four and last four characters.
///
/// Values shorter than 10 characters are fully masked as `****`.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}
