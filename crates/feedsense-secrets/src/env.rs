// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-variable secret provider.

use feedsense_core::{FeedsenseError, SecretProvider};
use secrecy::SecretString;

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads secrets from the process environment.
///
/// A secret id maps to an upper-snake variable name:
/// `openai-api-key` -> `OPENAI_API_KEY`, `slack-webhook-url` -> `SLACK_WEBHOOK_URL`.
/// A variable that is set to the empty string is returned as an empty secret.
pub struct EnvSecretProvider {
    lookup: Lookup,
}

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self {
            lookup: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// Uses `lookup` instead of the process environment.
    pub fn with_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
        }
    }
}

impl Default for EnvSecretProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment variable name for a secret id.
pub fn env_var_name(secret_id: &str) -> String {
    secret_id
        .chars()
        .map(|c| match c {
            '-' | '.' | '/' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

impl SecretProvider for EnvSecretProvider {
    fn name(&self) -> &str {
        "env"
    }

    fn get_secret(&self, secret_id: &str) -> Result<SecretString, FeedsenseError> {
        let var = env_var_name(secret_id);
        (self.lookup)(&var)
            .map(SecretString::from)
            .ok_or_else(|| FeedsenseError::Secret {
                id: secret_id.to_string(),
                message: format!("environment variable {var} is not set"),
            })
    }
}
