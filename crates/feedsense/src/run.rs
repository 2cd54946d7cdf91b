// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `feedsense run` command implementation.

use feedsense::build_adapters;
use feedsense_config::FeedsenseConfig;
use feedsense_config::model::Backend;
use feedsense_core::FeedsenseError;
use feedsense_pipeline::RunReport;
use feedsense_secrets::{provider_from_config, resolve_secrets};

/// Resolves secrets, opens the backend and executes one run.
///
/// Secrets and stores are set up before the first row is selected; a
/// failure there aborts without processing anything.
pub async fn run_pipeline(
    config: &FeedsenseConfig,
    backend: Backend,
    limit: Option<usize>,
) -> Result<RunReport, FeedsenseError> {
    let provider = provider_from_config(&config.secrets)?;
    let secrets = resolve_secrets(config, provider.as_ref())?;
    let adapters = build_adapters(config, &secrets, backend).await?;

    let report = adapters.into_pipeline(config, limit).run().await?;
    println!(
        "feedsense: {} (selected {}, failed {})",
        report.outcome,
        report.selected,
        report.failed()
    );
    Ok(report)
}
