// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter construction from configuration and resolved secrets.

use std::sync::Arc;

use feedsense_classifier::Classifier;
use feedsense_config::FeedsenseConfig;
use feedsense_config::model::Backend;
use feedsense_core::{FeedbackSource, FeedsenseError, PluginAdapter, ResultSink};
use feedsense_notify::WebhookNotifier;
use feedsense_openai::OpenAiProvider;
use feedsense_pipeline::Pipeline;
use feedsense_secrets::ResolvedSecrets;
use feedsense_storage::{CsvStore, SqliteWarehouse};
use tracing::info;

/// Every collaborator of a run, built but not yet assembled.
pub struct Adapters {
    pub completion: Arc<OpenAiProvider>,
    pub source: Arc<dyn FeedbackSource>,
    pub sink: Arc<dyn ResultSink>,
    pub notifier: Arc<WebhookNotifier>,
}

/// Builds the adapters for `backend`.
///
/// Opening the SQLite warehouse happens here, so an unreachable database
/// fails before any row is selected.
pub async fn build_adapters(
    config: &FeedsenseConfig,
    secrets: &ResolvedSecrets,
    backend: Backend,
) -> Result<Adapters, FeedsenseError> {
    let completion = Arc::new(OpenAiProvider::new(&config.openai, &secrets.openai_api_key)?);
    let notifier = Arc::new(WebhookNotifier::from_config(
        &config.notify,
        secrets.webhook_url.clone(),
    )?);

    let (source, sink): (Arc<dyn FeedbackSource>, Arc<dyn ResultSink>) = match backend {
        Backend::Sqlite => {
            let warehouse = Arc::new(SqliteWarehouse::open(&config.warehouse).await?);
            info!(
                database = %config.warehouse.database_path,
                source = warehouse.source_table(),
                output = warehouse.output_table(),
                "warehouse opened"
            );
            (warehouse.clone(), warehouse)
        }
        Backend::Csv => {
            let store = Arc::new(CsvStore::new(&config.csv));
            info!(
                input = %store.input_path().display(),
                output = %store.output_path().display(),
                "CSV backend selected"
            );
            (store.clone(), store)
        }
    };

    Ok(Adapters {
        completion,
        source,
        sink,
        notifier,
    })
}

impl Adapters {
    /// Adapters in health-check order.
    pub fn all(&self) -> Vec<&dyn PluginAdapter> {
        let source: &dyn PluginAdapter = &*self.source;
        let completion: &dyn PluginAdapter = &*self.completion;
        let notifier: &dyn PluginAdapter = &*self.notifier;
        vec![source, completion, notifier]
    }

    /// Assembles a pipeline using the `[classifier]` and `[pipeline]` sections.
    pub fn into_pipeline(self, config: &FeedsenseConfig, limit: Option<usize>) -> Pipeline {
        let classifier = Classifier::from_config(self.completion, &config.classifier);
        Pipeline::new(self.source, self.sink, classifier, self.notifier).with_limit(limit)
    }
}
