// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup.
//!
//! All statements run on tokio-rusqlite's single background thread, so reads
//! and the batch insert never interleave within one process.

use std::path::Path;

use feedsense_core::FeedsenseError;
use tracing::debug;

/// A handle to the warehouse SQLite file.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (or creates) the database file, creating parent directories.
    pub async fn open(path: &str) -> Result<Self, FeedsenseError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(FeedsenseError::storage)?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(FeedsenseError::storage)?;
        let db = Self { conn };
        db.apply_pragmas().await?;
        debug!(path, "warehouse database opened");
        Ok(db)
    }

    /// Opens a private in-memory database.
    pub async fn open_in_memory() -> Result<Self, FeedsenseError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(FeedsenseError::storage)?;
        let db = Self { conn };
        db.apply_pragmas().await?;
        Ok(db)
    }

    async fn apply_pragmas(&self) -> Result<(), FeedsenseError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch(
                    "PRAGMA journal_mode = WAL;
                     PRAGMA busy_timeout = 5000;
                     PRAGMA synchronous = NORMAL;",
                )
            })
            .await
            .map_err(map_tr_err)
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }
}

/// Converts a tokio-rusqlite error into a storage error.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> FeedsenseError {
    FeedsenseError::storage(e)
}
