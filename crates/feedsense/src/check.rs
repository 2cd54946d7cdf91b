// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `feedsense check` command implementation.
//!
//! Resolves secrets and health-checks every adapter of the configured
//! backend without selecting or classifying anything.

use feedsense::build_adapters;
use feedsense_config::FeedsenseConfig;
use feedsense_core::{FeedsenseError, HealthStatus};
use feedsense_secrets::{mask_secret, provider_from_config, resolve_secrets};
use secrecy::ExposeSecret;

/// Returns `Ok(false)` when any adapter reports itself unhealthy.
pub async fn run_check(config: &FeedsenseConfig) -> Result<bool, FeedsenseError> {
    println!("  feedsense check");
    println!("  {}", "-".repeat(50));
    println!("  [OK]   config (backend={:?})", config.pipeline.backend);

    let provider = provider_from_config(&config.secrets)?;
    let secrets = resolve_secrets(config, provider.as_ref())?;
    println!(
        "  [OK]   secret {} = {}",
        config.openai.api_key_secret,
        mask_secret(secrets.openai_api_key.expose_secret())
    );
    if secrets.notifications_enabled() {
        println!(
            "  [OK]   secret {} = {}",
            config.notify.webhook_secret,
            mask_secret(secrets.webhook_url.expose_secret())
        );
    } else {
        println!(
            "  [WARN] secret {} is empty, notifications disabled",
            config.notify.webhook_secret
        );
    }

    let adapters = build_adapters(config, &secrets, config.pipeline.backend).await?;
    let mut healthy = true;
    for adapter in adapters.all() {
        let status = adapter.health_check().await?;
        let line = match &status {
            HealthStatus::Healthy => format!("  [OK]   {}", adapter.name()),
            HealthStatus::Degraded(reason) => format!("  [WARN] {}: {reason}", adapter.name()),
            HealthStatus::Unhealthy(reason) => {
                healthy = false;
                format!("  [FAIL] {}: {reason}", adapter.name())
            }
        };
        println!("{line}");
    }
    Ok(healthy)
}
