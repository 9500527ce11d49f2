//! Query execution against the card database.
//!
//! The runner walks the configured table list in order, builds one count
//! query per table and collects the rows. A per-table failure is logged and
//! recorded in the outcome; the remaining tables are still attempted, so the
//! caller can tell a complete report from a partial one.

use super::query::build_count_query;
use super::types::{CardStatusCounts, TableReport};
use crate::config::{ColumnRoles, DatetimeRoles, StatusLiterals};
use rusqlite::Connection;
use std::path::Path;

#[derive(Debug)]
pub enum SourceError {
    Database(rusqlite::Error),
}

impl From<rusqlite::Error> for SourceError {
    fn from(err: rusqlite::Error) -> Self {
        SourceError::Database(err)
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Database(e) => write!(f, "database error: {}", e),
        }
    }
}

impl std::error::Error for SourceError {}

/// Credentials recovered from the configuration; the password arrives here
/// already deobfuscated.
#[derive(Debug, Clone)]
pub struct DbCredentials {
    pub user: String,
    pub password: String,
}

/// Seam to the SQL engine: execute one query text, get back counted rows.
pub trait CountSource {
    fn fetch_counts(&self, sql: &str) -> Result<Vec<CardStatusCounts>, SourceError>;
}

/// Production source backed by a SQLite database file.
pub struct SqliteCountSource {
    conn: Connection,
}

impl SqliteCountSource {
    /// Open the database. The connection is scoped to this value and
    /// released on drop.
    pub fn open(path: impl AsRef<Path>, credentials: &DbCredentials) -> Result<Self, SourceError> {
        let path = path.as_ref();
        log::info!(
            "Opening database {} as user {}",
            path.display(),
            credentials.user
        );
        let conn = Connection::open(path)?;
        if !credentials.password.is_empty() {
            // SQLCipher builds key the database file from this pragma; a
            // plain SQLite build treats the unknown pragma as a no-op.
            conn.pragma_update(None, "key", credentials.password.as_str())?;
        }
        Ok(Self { conn })
    }
}

impl CountSource for SqliteCountSource {
    fn fetch_counts(&self, sql: &str) -> Result<Vec<CardStatusCounts>, SourceError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(CardStatusCounts {
                card_type: row.get("CARD_TYPE")?,
                activated: row.get("ACTIVATED")?,
                total_used: row.get("TOTAL_USED")?,
                deactivated: row.get("DEACTIVATED")?,
                expired: row.get("EXPIRED")?,
                new_cards: row.get("NEW")?,
                booked_in: row.get("BOOKEDIN")?,
                total: row.get("TOTAL")?,
                daily_used: row.get("DAILY_USED")?,
            })
        })?;

        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }
}

/// A table whose query failed during the run.
#[derive(Debug)]
pub struct TableFailure {
    pub table: String,
    pub error: SourceError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Complete,
    Partial,
    Failed,
}

/// Everything one run produced: per-table reports plus per-table failures.
#[derive(Debug)]
pub struct RunOutcome {
    pub reports: Vec<TableReport>,
    pub failures: Vec<TableFailure>,
}

impl RunOutcome {
    pub fn status(&self) -> RunStatus {
        match (self.reports.is_empty(), self.failures.is_empty()) {
            (_, true) => RunStatus::Complete,
            (false, false) => RunStatus::Partial,
            (true, false) => RunStatus::Failed,
        }
    }
}

pub struct AggregationRunner<'a, S: CountSource> {
    source: &'a S,
    columns: &'a ColumnRoles,
    statuses: &'a StatusLiterals,
    datetimes: &'a DatetimeRoles,
}

impl<'a, S: CountSource> AggregationRunner<'a, S> {
    pub fn new(
        source: &'a S,
        columns: &'a ColumnRoles,
        statuses: &'a StatusLiterals,
        datetimes: &'a DatetimeRoles,
    ) -> Self {
        Self {
            source,
            columns,
            statuses,
            datetimes,
        }
    }

    /// Run the count query for every table, in configured order.
    pub fn run(&self, tables: &[String]) -> RunOutcome {
        let mut reports = Vec::new();
        let mut failures = Vec::new();

        for table in tables {
            let sql = build_count_query(table, self.columns, self.statuses, self.datetimes);
            log::info!("Fetching the data for table {}", table);

            match self.source.fetch_counts(&sql) {
                Ok(rows) => {
                    log::info!(
                        "Total records in table {} with select conditions are {}",
                        table,
                        rows.len()
                    );
                    reports.push(TableReport {
                        table: table.clone(),
                        rows,
                    });
                }
                Err(e) => {
                    log::error!("Select query failed for table {}: {}", table, e);
                    failures.push(TableFailure {
                        table: table.clone(),
                        error: e,
                    });
                }
            }
        }

        RunOutcome { reports, failures }
    }
}
