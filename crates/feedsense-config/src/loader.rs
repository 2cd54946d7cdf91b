// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./feedsense.toml` > `~/.config/feedsense/feedsense.toml`
//! > `/etc/feedsense/feedsense.toml` with environment variable overrides via
//! the `FEEDSENSE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::FeedsenseConfig;

/// Section names, in the order they are tried when mapping env vars.
const SECTIONS: [&str; 7] = [
    "pipeline",
    "classifier",
    "openai",
    "warehouse",
    "csv",
    "notify",
    "secrets",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/feedsense/feedsense.toml` (system-wide)
/// 3. `~/.config/feedsense/feedsense.toml` (user XDG config)
/// 4. `./feedsense.toml` (local directory)
/// 5. `FEEDSENSE_*` environment variables
pub fn load_config() -> Result<FeedsenseConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<FeedsenseConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FeedsenseConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FeedsenseConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FeedsenseConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for XDG config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(FeedsenseConfig::default()))
        .merge(Toml::file("/etc/feedsense/feedsense.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("feedsense/feedsense.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("feedsense.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `FEEDSENSE_WAREHOUSE_OUTPUT_TABLE` must map to
/// `warehouse.output_table`, not `warehouse.output.table`.
fn env_provider() -> Env {
    Env::prefixed("FEEDSENSE_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
