// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat-file store: a CSV input and an append-only CSV output.
//!
//! The output file doubles as the dedup reference. Columns are matched by
//! header name, so column order in either file does not matter. Appends
//! follow the header already on disk, and a failed append is truncated back
//! to the previous length.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use feedsense_config::model::CsvConfig;
use feedsense_core::{
    AdapterType, FeedbackRow, FeedbackSource, FeedsenseError, HealthStatus, IdentityKey,
    OutputRecord, PluginAdapter, ResultSink, select_unprocessed,
};
use tracing::{debug, info, warn};

/// CSV-backed feedback source and result sink.
#[derive(Debug, Clone)]
pub struct CsvStore {
    input_path: PathBuf,
    output_path: PathBuf,
}

impl CsvStore {
    pub fn new(config: &CsvConfig) -> Self {
        Self::from_paths(&config.input_path, &config.output_path)
    }

    pub fn from_paths(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input_path: input.as_ref().to_path_buf(),
            output_path: output.as_ref().to_path_buf(),
        }
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

async fn blocking<T, F>(task: F) -> Result<T, FeedsenseError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, FeedsenseError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| FeedsenseError::Internal(format!("CSV task failed: {e}")))?
}

fn read_source(path: &Path) -> Result<Vec<FeedbackRow>, FeedsenseError> {
    let mut reader = csv::Reader::from_path(path).map_err(FeedsenseError::storage)?;
    reader
        .deserialize::<FeedbackRow>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(FeedsenseError::storage)
}

/// Identity keys already written. A missing or empty file holds none.
fn read_processed_keys(path: &Path) -> Result<HashSet<IdentityKey>, FeedsenseError> {
    if !path.exists() || std::fs::metadata(path).map_err(FeedsenseError::storage)?.len() == 0 {
        return Ok(HashSet::new());
    }

    let mut reader = csv::Reader::from_path(path).map_err(FeedsenseError::storage)?;
    let headers = reader.headers().map_err(FeedsenseError::storage)?.clone();
    let column = |name: &str| {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            FeedsenseError::storage(format!(
                "output file {} has no `{name}` column",
                path.display()
            ))
        })
    };
    let (user, message, comment) = (
        column("user_id")?,
        column("message_id")?,
        column("user_comment")?,
    );

    let mut keys = HashSet::new();
    for record in reader.records() {
        let record = record.map_err(FeedsenseError::storage)?;
        let field = |i: usize| record.get(i).unwrap_or_default().to_string();
        keys.insert(IdentityKey {
            user_id: field(user),
            message_id: field(message),
            user_comment: field(comment),
        });
    }
    Ok(keys)
}

/// Column names of an existing output file, in file order.
///
/// Every column this store writes must be present; unknown extra columns are
/// allowed and left empty on append.
fn existing_columns(path: &Path) -> Result<Vec<String>, FeedsenseError> {
    let mut reader = csv::Reader::from_path(path).map_err(FeedsenseError::storage)?;
    let headers = reader.headers().map_err(FeedsenseError::storage)?;
    let columns: Vec<String> = headers.iter().map(str::to_string).collect();
    if let Some(missing) = OutputRecord::COLUMNS
        .iter()
        .find(|name| !columns.iter().any(|c| c == *name))
    {
        return Err(FeedsenseError::storage(format!(
            "output file {} has no `{missing}` column",
            path.display()
        )));
    }
    Ok(columns)
}

/// Serializes the whole batch first, then appends it with one write.
fn append_records(path: &Path, records: &[OutputRecord]) -> Result<(), FeedsenseError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(FeedsenseError::storage)?;
    }

    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)
        .map_err(FeedsenseError::storage)?;
    let len = file.metadata().map_err(FeedsenseError::storage)?.len();

    let columns: Vec<String> = if len == 0 {
        OutputRecord::COLUMNS.iter().map(|c| c.to_string()).collect()
    } else {
        existing_columns(path)?
    };

    let mut buf = Vec::new();
    if len > 0 && !ends_with_newline(&mut file, len)? {
        buf.push(b'\n');
    }
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        if len == 0 {
            writer
                .write_record(&columns)
                .map_err(FeedsenseError::storage)?;
        }
        for record in records {
            writer
                .write_record(
                    columns
                        .iter()
                        .map(|c| record.column_text(c).unwrap_or_default()),
                )
                .map_err(FeedsenseError::storage)?;
        }
        writer.flush().map_err(FeedsenseError::storage)?;
    }

    commit(&mut file, len, &buf)
}

/// Destination of an append that can be cut back to its previous length.
trait AppendTarget: Write {
    fn truncate_to(&mut self, len: u64) -> std::io::Result<()>;
    fn sync(&mut self) -> std::io::Result<()>;
}

impl AppendTarget for std::fs::File {
    fn truncate_to(&mut self, len: u64) -> std::io::Result<()> {
        self.set_len(len)
    }

    fn sync(&mut self) -> std::io::Result<()> {
        self.sync_all()
    }
}

/// Writes `buf` and syncs it. On failure the target is truncated back to
/// `len` so no partial record is left behind.
fn commit<T: AppendTarget>(target: &mut T, len: u64, buf: &[u8]) -> Result<(), FeedsenseError> {
    if let Err(e) = target.write_all(buf).and_then(|()| target.sync()) {
        if let Err(rollback) = target.truncate_to(len) {
            warn!(error = %rollback, "failed to roll back partial CSV append");
        }
        return Err(FeedsenseError::storage(e));
    }
    Ok(())
}

fn ends_with_newline(file: &mut std::fs::File, len: u64) -> Result<bool, FeedsenseError> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))
        .map_err(FeedsenseError::storage)?;
    file.read_exact(&mut last).map_err(FeedsenseError::storage)?;
    Ok(last[0] == b'\n')
}

#[async_trait]
impl PluginAdapter for CsvStore {
    fn name(&self) -> &str {
        "csv"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Source
    }

    async fn health_check(&self) -> Result<HealthStatus, FeedsenseError> {
        if self.input_path.is_file() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy(format!(
                "input file {} not found",
                self.input_path.display()
            )))
        }
    }
}

#[async_trait]
impl FeedbackSource for CsvStore {
    async fn fetch_unprocessed(&self) -> Result<Vec<FeedbackRow>, FeedsenseError> {
        let input = self.input_path.clone();
        let output = self.output_path.clone();
        let rows = blocking(move || {
            let processed = read_processed_keys(&output)?;
            let source = read_source(&input)?;
            debug!(
                source_rows = source.len(),
                processed = processed.len(),
                "CSV files read"
            );
            Ok(select_unprocessed(source, &processed))
        })
        .await?;
        debug!(selected = rows.len(), "unprocessed rows fetched");
        Ok(rows)
    }
}

#[async_trait]
impl ResultSink for CsvStore {
    async fn append(&self, records: &[OutputRecord]) -> Result<(), FeedsenseError> {
        if records.is_empty() {
            return Ok(());
        }
        let path = self.output_path.clone();
        let records = records.to_vec();
        let count = records.len();
        blocking(move || append_records(&path, &records)).await?;
        info!(path = %self.output_path.display(), rows = count, "batch appended");
        Ok(())
    }
}
