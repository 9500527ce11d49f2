//! Report Core - configuration-driven count aggregation and file emission.
//!
//! ```text
//! build_count_query (query.rs)
//!     ↓
//! AggregationRunner → CountSource (runner.rs)
//!     ↓
//! TableReport / CardStatusCounts (types.rs)
//!     ↓
//! ReportEmitter → CSV + text snapshot (emitter.rs)
//! ```

pub mod emitter;
pub mod query;
pub mod runner;
pub mod types;

pub use emitter::{EmitError, ReportEmitter, ReportPaths, SortOrder};
pub use query::build_count_query;
pub use runner::{
    AggregationRunner, CountSource, DbCredentials, RunOutcome, RunStatus, SourceError,
    SqliteCountSource, TableFailure,
};
pub use types::{CardStatusCounts, TableReport};
