//! Report file emission.
//!
//! Each non-empty table result becomes a pair of files in the run
//! directory: a delimited CSV opened in append mode (header written on
//! every run, so runs sharing a path accumulate blocks) and a fresh
//! whitespace-aligned text snapshot that is overwritten each run.
//!
//! The primary table is presented in descending category order; every
//! other table keeps the query's natural ascending order.

use super::types::{CardStatusCounts, TableReport};
use chrono::{DateTime, Local};
use std::cmp::Reverse;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum EmitError {
    Io(std::io::Error),
}

impl From<std::io::Error> for EmitError {
    fn from(err: std::io::Error) -> Self {
        EmitError::Io(err)
    }
}

impl std::fmt::Display for EmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmitError::Io(e) => write!(f, "report write failed: {}", e),
        }
    }
}

impl std::error::Error for EmitError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Paths written for one table.
#[derive(Debug)]
pub struct ReportPaths {
    pub csv: PathBuf,
    pub text: PathBuf,
}

pub struct ReportEmitter {
    run_dir: PathBuf,
    stamp: String,
}

impl ReportEmitter {
    /// Create the emitter, creating the run directory if absent.
    pub fn new(run_dir: impl Into<PathBuf>, run_time: &DateTime<Local>) -> Result<Self, EmitError> {
        let run_dir = run_dir.into();
        fs::create_dir_all(&run_dir)?;
        Ok(Self {
            run_dir,
            stamp: run_time.format("%d%m%Y_%H%M").to_string(),
        })
    }

    /// Write the file pair for one table. An empty result writes nothing
    /// and returns `None`.
    pub fn emit(
        &self,
        report: &TableReport,
        order: SortOrder,
    ) -> Result<Option<ReportPaths>, EmitError> {
        if report.rows.is_empty() {
            log::info!(
                "No records found for table {}; skipping report files",
                report.table
            );
            return Ok(None);
        }

        let mut rows = report.rows.clone();
        match order {
            SortOrder::Ascending => rows.sort_by_key(|r| r.card_type),
            SortOrder::Descending => rows.sort_by_key(|r| Reverse(r.card_type)),
        }

        let csv = self
            .run_dir
            .join(format!("Report_{}_{}.csv", report.table, self.stamp));
        let text = self
            .run_dir
            .join(format!("Report_{}_{}.txt", report.table, self.stamp));

        append_csv(&csv, &rows)?;
        fs::write(&text, render_aligned(&rows))?;

        log::info!(
            "Wrote {} rows for table {} to {}",
            rows.len(),
            report.table,
            csv.display()
        );
        Ok(Some(ReportPaths { csv, text }))
    }

    /// Emit every report; the primary table descends, the rest ascend.
    pub fn emit_all(&self, reports: &[TableReport], primary_table: &str) -> Result<(), EmitError> {
        for report in reports {
            let order = if report.table == primary_table {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            };
            self.emit(report, order)?;
        }
        Ok(())
    }
}

fn append_csv(path: &Path, rows: &[CardStatusCounts]) -> Result<(), EmitError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{}", CardStatusCounts::COLUMNS.join(","))?;
    for row in rows {
        let values: Vec<String> = row.values().iter().map(|v| v.to_string()).collect();
        writeln!(out, "{}", values.join(","))?;
    }
    out.flush()?;
    Ok(())
}

/// Right-aligned plain-text rendering in the shape of the legacy snapshot.
pub fn render_aligned(rows: &[CardStatusCounts]) -> String {
    let value_rows: Vec<[i64; 9]> = rows.iter().map(|r| r.values()).collect();

    let mut widths: Vec<usize> = CardStatusCounts::COLUMNS.iter().map(|c| c.len()).collect();
    for values in &value_rows {
        for (i, v) in values.iter().enumerate() {
            widths[i] = widths[i].max(v.to_string().len());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = CardStatusCounts::COLUMNS
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:>width$}", c, width = *w))
        .collect();
    out.push_str(&header.join("  "));
    out.push('\n');

    for values in &value_rows {
        let line: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:>width$}", v, width = *w))
            .collect();
        out.push_str(&line.join("  "));
        out.push('\n');
    }

    out
}
