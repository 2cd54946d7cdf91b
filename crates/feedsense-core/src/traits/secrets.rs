// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret provider trait.

use secrecy::SecretString;

use crate::error::FeedsenseError;

/// Opaque key-value secret lookup.
///
/// A secret that does not exist is an error. A secret that exists with an
/// empty value is returned as-is; callers decide whether empty is meaningful.
pub trait SecretProvider: Send + Sync {
    /// Returns the provider's name for log output.
    fn name(&self) -> &str;

    /// Fetches the secret stored under `secret_id`.
    fn get_secret(&self, secret_id: &str) -> Result<SecretString, FeedsenseError>;
}
