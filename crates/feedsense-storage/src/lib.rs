// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feedback sources and result sinks for the Feedsense pipeline.
//!
//! Two backends implement both [`feedsense_core::FeedbackSource`] and
//! [`feedsense_core::ResultSink`]: a SQLite warehouse and a pair of CSV files.

pub mod csv_store;
pub mod database;
pub mod warehouse;

pub use csv_store::CsvStore;
pub use database::Database;
pub use warehouse::{OutputRecordRow, SqliteWarehouse};
