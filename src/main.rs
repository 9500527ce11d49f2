//! CardReport - Card Status Report Batch Tool
//!
//! Single-shot batch job that counts cards per type and status in a set of
//! source tables and materializes the counts as per-run report files.
//!
//! # Architecture
//!
//! ```text
//! StandbyGuard (TCP probe of the active mate)
//!     ↓
//! cipher (recover the database password from its obfuscated form)
//!     ↓
//! build_count_query (per-table GROUP BY query from configured roles)
//!     ↓
//! AggregationRunner → CountSource (SQLite)
//!     ↓
//! ReportEmitter → append-mode CSV + aligned text snapshot per table
//! ```
//!
//! The run is strictly sequential: one probe, one connection, one query per
//! table, one file pair per table. Per-table query failures are collected
//! into the run outcome instead of aborting the remaining tables.

pub mod cipher;
pub mod config;
pub mod report_core;
pub mod standby;
