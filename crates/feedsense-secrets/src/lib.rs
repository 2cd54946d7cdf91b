// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret providers for the Feedsense pipeline.
//!
//! Implements [`SecretProvider`](feedsense_core::SecretProvider) over
//! environment variables and over a TOML secrets file, and resolves the
//! secrets a run needs before any row is touched.

pub mod env;
pub mod file;
pub mod resolve;

pub use env::EnvSecretProvider;
pub use file::FileSecretProvider;
pub use resolve::{
    ResolvedSecrets, mask_secret, provider_from_config, resolve_api_key, resolve_secrets,
};
