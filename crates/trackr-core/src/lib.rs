//! Report engine for the trackr time tracker.
//!
//! This crate turns finalized work intervals into a weekly table:
//! - Accumulation: per-task durations with a running total for one scope
//! - Table: fixed-width `|`-delimited rendering of those scopes
//! - Report: grouping intervals by calendar day plus a whole-window totals row
//!
//! It does no I/O. Callers hand it intervals already converted to local time.

mod accumulator;
mod error;
pub mod report;
pub mod table;
mod types;

pub use accumulator::{Entry, Percent, TaskDurations};
pub use error::ReportError;
pub use report::{Bucket, NO_DATA_NOTICE, Report, ReportBuilder, show_report};
pub use table::{DEFAULT_CELL_WIDTH, TableLayout};
pub use types::{Interval, TaskName, ValidationError};
