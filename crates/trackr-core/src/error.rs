//! Errors raised while building a report.

use chrono::TimeDelta;
use thiserror::Error;

/// Report generation errors.
///
/// All of these are local invariant violations: none of them is transient, so
/// report generation aborts on the first one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// A duration that is not a valid elapsed-time quantity (negative, or out of range).
    #[error("invalid duration for task {task}: {duration}")]
    InvalidValue { task: String, duration: TimeDelta },

    /// The task has no entry in this scope.
    #[error("task not found: {task}")]
    NotFound { task: String },

    /// A percentage was requested while the scope's total is zero.
    #[error("cannot compute a percentage of an empty total")]
    DivisionUndefined,
}
