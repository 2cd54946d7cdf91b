// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TOML file secret provider.
//!
//! The file holds flat `secret-id = "value"` pairs:
//!
//! ```toml
//! openai-api-key = "sk-..."
//! slack-webhook-url = ""
//! ```

use std::collections::HashMap;
use std::path::Path;

use feedsense_core::{FeedsenseError, SecretProvider};
use secrecy::SecretString;
use tracing::debug;

/// Secrets loaded once from a TOML file.
pub struct FileSecretProvider {
    secrets: HashMap<String, SecretString>,
}

impl std::fmt::Debug for FileSecretProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&String> = self.secrets.keys().collect();
        ids.sort();
        f.debug_struct("FileSecretProvider")
            .field("ids", &ids)
            .finish()
    }
}

impl FileSecretProvider {
    /// Reads and parses the secrets file. Non-string values are rejected.
    pub fn open(path: &Path) -> Result<Self, FeedsenseError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FeedsenseError::Config(format!(
                "cannot read secrets file {}: {e}",
                path.display()
            ))
        })?;
        let provider = Self::from_toml_str(&content).map_err(|e| match e {
            FeedsenseError::Config(msg) => {
                FeedsenseError::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;
        debug!(path = %path.display(), count = provider.secrets.len(), "secrets file loaded");
        Ok(provider)
    }

    /// Parses secrets from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, FeedsenseError> {
        let table: toml::Table = content
            .parse()
            .map_err(|e| FeedsenseError::Config(format!("invalid secrets TOML: {e}")))?;

        let mut secrets = HashMap::with_capacity(table.len());
        for (id, value) in table {
            match value {
                toml::Value::String(s) => {
                    secrets.insert(id, SecretString::from(s));
                }
                other => {
                    return Err(FeedsenseError::Config(format!(
                        "secret `{id}` must be a string, found {}",
                        other.type_str()
                    )));
                }
            }
        }
        Ok(Self { secrets })
    }
}

impl SecretProvider for FileSecretProvider {
    fn name(&self) -> &str {
        "file"
    }

    fn get_secret(&self, secret_id: &str) -> Result<SecretString, FeedsenseError> {
        self.secrets
            .get(secret_id)
            .cloned()
            .ok_or_else(|| FeedsenseError::Secret {
                id: secret_id.to_string(),
                message: "not present in secrets file".to_string(),
            })
    }
}
