// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite warehouse implementing both the feedback source and the result sink.
//!
//! A `(dataset, table)` pair addresses the SQLite table `<dataset>_<table>`.
//! Source columns are read as text so that integer or timestamp ids compare
//! equal to the text copies held in the output table.

use async_trait::async_trait;
use feedsense_config::model::WarehouseConfig;
use feedsense_config::validation::is_sql_identifier;
use feedsense_core::{
    AdapterType, FeedbackRow, FeedbackSource, FeedsenseError, HealthStatus, OutputRecord,
    PluginAdapter, ResultSink,
};
use rusqlite::{OptionalExtension, params};
use tracing::{debug, info};

use crate::database::{Database, map_tr_err};

/// Source columns in [`FeedbackRow`] field order.
const SOURCE_COLUMNS: [&str; 8] = [
    "user_id",
    "chat_id",
    "message_id",
    "timestamp",
    "system_message",
    "user_comment",
    "source_type",
    "user_feedback_type",
];

/// Columns forming the identity key.
const KEY_COLUMNS: [&str; 3] = ["user_id", "message_id", "user_comment"];

/// SQLite-backed feedback source and append-only output store.
pub struct SqliteWarehouse {
    db: Database,
    source_table: String,
    output_table: String,
}

impl SqliteWarehouse {
    /// Wraps an open database. Table names are rebuilt and checked here since
    /// they are spliced into SQL text.
    pub fn new(db: Database, config: &WarehouseConfig) -> Result<Self, FeedsenseError> {
        for (key, value) in [
            ("dataset", &config.dataset),
            ("source_table", &config.source_table),
            ("output_table", &config.output_table),
        ] {
            if !is_sql_identifier(value) {
                return Err(FeedsenseError::Config(format!(
                    "warehouse.{key} `{value}` is not a valid SQL identifier"
                )));
            }
        }
        Ok(Self {
            db,
            source_table: qualified(&config.dataset, &config.source_table),
            output_table: qualified(&config.dataset, &config.output_table),
        })
    }

    /// Opens the configured database file.
    pub async fn open(config: &WarehouseConfig) -> Result<Self, FeedsenseError> {
        let db = Database::open(&config.database_path).await?;
        Self::new(db, config)
    }

    pub fn source_table(&self) -> &str {
        &self.source_table
    }

    pub fn output_table(&self) -> &str {
        &self.output_table
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    async fn output_exists(&self) -> Result<bool, FeedsenseError> {
        table_exists(&self.db, &self.output_table).await
    }

    /// Every output row, in insertion order.
    pub async fn output_rows(&self) -> Result<Vec<OutputRecordRow>, FeedsenseError> {
        if !self.output_exists().await? {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {} FROM \"{}\" ORDER BY rowid",
            OutputRecord::COLUMNS.join(", "),
            self.output_table
        );
        self.db
            .connection()
            .call(move |conn| -> Result<Vec<OutputRecordRow>, rusqlite::Error> {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([], |row| {
                    Ok(OutputRecordRow {
                        user_id: row.get(0)?,
                        chat_id: row.get(1)?,
                        message_id: row.get(2)?,
                        timestamp: row.get(3)?,
                        system_message: row.get(4)?,
                        user_comment: row.get(5)?,
                        source_type: row.get(6)?,
                        user_feedback_type: row.get(7)?,
                        sentiment_score: row.get(8)?,
                        sentiment_type: row.get(9)?,
                        aspect: row.get(10)?,
                        processed_at: row.get(11)?,
                    })
                })?;
                rows.collect()
            })
            .await
            .map_err(map_tr_err)
    }
}

/// One output row as stored, without re-validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecordRow {
    pub user_id: String,
    pub chat_id: String,
    pub message_id: String,
    pub timestamp: String,
    pub system_message: String,
    pub user_comment: String,
    pub source_type: String,
    pub user_feedback_type: String,
    pub sentiment_score: i64,
    pub sentiment_type: String,
    pub aspect: String,
    pub processed_at: String,
}

fn qualified(dataset: &str, table: &str) -> String {
    format!("{dataset}_{table}")
}

fn as_text(alias: &str, column: &str) -> String {
    format!("COALESCE(CAST({alias}.{column} AS TEXT), '')")
}

async fn table_exists(db: &Database, name: &str) -> Result<bool, FeedsenseError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1",
                    params![name],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
        .await
        .map_err(map_tr_err)
}

/// The selection query. Without an output table every source row is new.
fn select_sql(source: &str, output: Option<&str>) -> String {
    let columns = SOURCE_COLUMNS
        .iter()
        .map(|c| as_text("src", c))
        .collect::<Vec<_>>()
        .join(", ");
    let mut sql = format!("SELECT {columns} FROM \"{source}\" AS src");
    if let Some(output) = output {
        let matches = KEY_COLUMNS
            .iter()
            .map(|c| format!("out.{c} = {}", as_text("src", c)))
            .collect::<Vec<_>>()
            .join(" AND ");
        sql.push_str(&format!(
            " WHERE NOT EXISTS (SELECT 1 FROM \"{output}\" AS out WHERE {matches})"
        ));
    }
    sql
}

fn output_ddl(output: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS \"{output}\" (
            user_id TEXT NOT NULL,
            chat_id TEXT NOT NULL,
            message_id TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            system_message TEXT NOT NULL,
            user_comment TEXT NOT NULL,
            source_type TEXT NOT NULL,
            user_feedback_type TEXT NOT NULL,
            sentiment_score INTEGER NOT NULL,
            sentiment_type TEXT NOT NULL,
            aspect TEXT NOT NULL,
            processed_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS \"{output}_identity\"
            ON \"{output}\" (user_id, message_id, user_comment);"
    )
}

#[async_trait]
impl PluginAdapter for SqliteWarehouse {
    fn name(&self) -> &str {
        "sqlite-warehouse"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Source
    }

    async fn health_check(&self) -> Result<HealthStatus, FeedsenseError> {
        if table_exists(&self.db, &self.source_table).await? {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy(format!(
                "source table `{}` does not exist",
                self.source_table
            )))
        }
    }
}

#[async_trait]
impl FeedbackSource for SqliteWarehouse {
    async fn fetch_unprocessed(&self) -> Result<Vec<FeedbackRow>, FeedsenseError> {
        let output = self.output_exists().await?.then_some(self.output_table.as_str());
        if output.is_none() {
            info!(table = %self.output_table, "output table absent, every source row is new");
        }
        let sql = select_sql(&self.source_table, output);

        let rows = self
            .db
            .connection()
            .call(move |conn| -> Result<Vec<FeedbackRow>, rusqlite::Error> {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([], |row| {
                    Ok(FeedbackRow {
                        user_id: row.get(0)?,
                        chat_id: row.get(1)?,
                        message_id: row.get(2)?,
                        timestamp: row.get(3)?,
                        system_message: row.get(4)?,
                        user_comment: row.get(5)?,
                        source_type: row.get(6)?,
                        user_feedback_type: row.get(7)?,
                    })
                })?;
                rows.collect()
            })
            .await
            .map_err(map_tr_err)?;

        debug!(source = %self.source_table, selected = rows.len(), "unprocessed rows fetched");
        Ok(rows)
    }
}

#[async_trait]
impl ResultSink for SqliteWarehouse {
    async fn append(&self, records: &[OutputRecord]) -> Result<(), FeedsenseError> {
        if records.is_empty() {
            return Ok(());
        }
        let ddl = output_ddl(&self.output_table);
        let insert = format!(
            "INSERT INTO \"{}\" ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            self.output_table,
            OutputRecord::COLUMNS.join(", ")
        );
        let records = records.to_vec();
        let count = records.len();

        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                let tx = conn.transaction()?;
                tx.execute_batch(&ddl)?;
                {
                    let mut stmt = tx.prepare(&insert)?;
                    for r in &records {
                        stmt.execute(params![
                            r.user_id,
                            r.chat_id,
                            r.message_id,
                            r.timestamp,
                            r.system_message,
                            r.user_comment,
                            r.source_type,
                            r.user_feedback_type,
                            i64::from(r.sentiment_score),
                            r.sentiment_type.to_string(),
                            r.aspect.to_string(),
                            r.processed_at_rfc3339(),
                        ])?;
                    }
                }
                tx.commit()
            })
            .await
            .map_err(map_tr_err)?;

        info!(table = %self.output_table, rows = count, "batch appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use feedsense_core::{Aspect, Classification, SentimentResult, SentimentScore, SentimentType};

    async fn warehouse() -> SqliteWarehouse {
        let db = Database::open_in_memory().await.unwrap();
        db.connection()
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TABLE analytics_user_feedback_and_flags (
                        user_id INTEGER, chat_id TEXT, message_id INTEGER, timestamp TEXT,
                        system_message TEXT, user_comment TEXT, source_type TEXT,
                        user_feedback_type TEXT
                    );
                    INSERT INTO analytics_user_feedback_and_flags VALUES
                        (1, 'c1', 10, '2024-05-01 10:00:00', 'Here is the plan.', 'too slow', 'web', 'thumbs_down'),
                        (2, 'c2', 20, '2024-05-01 11:00:00', 'Done.', 'love it', 'app', 'thumbs_up'),
                        (3, NULL, 30, NULL, 'Summary ready.', NULL, NULL, NULL);",
                )
            })
            .await
            .unwrap();
        SqliteWarehouse::new(db, &WarehouseConfig::default()).unwrap()
    }

    fn record(row: &FeedbackRow) -> OutputRecord {
        OutputRecord::new(
            row.clone(),
            SentimentResult::new(
                Classification {
                    sentiment_score: SentimentScore::try_from(1).unwrap(),
                    sentiment_type: SentimentType::Compliment,
                    aspect: Aspect::Praise,
                },
                Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap(),
            ),
        )
    }

    #[test]
    fn tables_are_qualified_by_dataset() {
        let sql = select_sql("analytics_src", Some("analytics_out"));
        assert!(sql.contains("FROM \"analytics_src\" AS src"));
        assert!(sql.contains("NOT EXISTS (SELECT 1 FROM \"analytics_out\" AS out"));
        assert!(!select_sql("analytics_src", None).contains("NOT EXISTS"));
    }

    #[tokio::test]
    async fn rejects_unsafe_identifiers() {
        let db = Database::open_in_memory().await.unwrap();
        let config = WarehouseConfig {
            output_table: "out\"; DROP TABLE x; --".into(),
            ..WarehouseConfig::default()
        };
        let err = SqliteWarehouse::new(db, &config).err().unwrap();
        assert!(err.is_fatal_configuration());
    }

    #[tokio::test]
    async fn missing_output_selects_every_row_as_text() {
        let wh = warehouse().await;
        let rows = wh.fetch_unprocessed().await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].user_id, "1");
        assert_eq!(rows[0].message_id, "10");
        assert_eq!(rows[2].chat_id, "");
        assert_eq!(rows[2].user_comment, "");
    }

    #[tokio::test]
    async fn appended_rows_are_not_reselected() {
        let wh = warehouse().await;
        let rows = wh.fetch_unprocessed().await.unwrap();
        wh.append(&[record(&rows[0])]).await.unwrap();

        let remaining = wh.fetch_unprocessed().await.unwrap();
        assert_eq!(remaining.len(), 2);
        assert_eq!(remaining[0].user_id, "2");
        assert_eq!(remaining[1].user_id, "3");
    }

    #[tokio::test]
    async fn append_creates_output_and_only_adds() {
        let wh = warehouse().await;
        let rows = wh.fetch_unprocessed().await.unwrap();
        wh.append(&[record(&rows[0])]).await.unwrap();
        wh.append(&[record(&rows[1])]).await.unwrap();

        let stored = wh.output_rows().await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].user_id, "1");
        assert_eq!(stored[0].sentiment_score, 1);
        assert_eq!(stored[0].sentiment_type, "compliment");
        assert_eq!(stored[0].aspect, "praise");
        assert_eq!(stored[0].processed_at, "2024-05-02T08:00:00.000000Z");
        assert_eq!(stored[1].user_id, "2");
    }

    #[tokio::test]
    async fn changed_comment_is_a_new_event() {
        let wh = warehouse().await;
        let rows = wh.fetch_unprocessed().await.unwrap();
        wh.append(&rows.iter().map(record).collect::<Vec<_>>())
            .await
            .unwrap();
        assert!(wh.fetch_unprocessed().await.unwrap().is_empty());

        wh.database()
            .connection()
            .call(|conn| {
                conn.execute(
                    "UPDATE analytics_user_feedback_and_flags SET user_comment = 'fixed now' WHERE user_id = 1",
                    [],
                )
            })
            .await
            .unwrap();
        let rows = wh.fetch_unprocessed().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_comment, "fixed now");
    }

    #[tokio::test]
    async fn failed_batch_leaves_nothing_behind() {
        let wh = warehouse().await;
        let rows = wh.fetch_unprocessed().await.unwrap();
        wh.append(&[record(&rows[0])]).await.unwrap();

        // A trigger that aborts on the second row of a batch.
        wh.database()
            .connection()
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TRIGGER reject_user_3 BEFORE INSERT ON analytics_feedback_sentiment_output
                     WHEN NEW.user_id = '3' BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
                )
            })
            .await
            .unwrap();

        let err = wh
            .append(&[record(&rows[1]), record(&rows[2])])
            .await
            .unwrap_err();
        assert!(matches!(err, FeedsenseError::Storage { .. }));
        assert_eq!(wh.output_rows().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_source_is_an_error() {
        let db = Database::open_in_memory().await.unwrap();
        let wh = SqliteWarehouse::new(db, &WarehouseConfig::default()).unwrap();
        assert!(wh.fetch_unprocessed().await.is_err());
        assert!(matches!(
            wh.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }
}
