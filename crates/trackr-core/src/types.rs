//! Core type definitions with validation.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ReportError;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The value contains a character that cannot be stored on a single line.
    #[error("{field} cannot contain control characters, got {value:?}")]
    ControlCharacter { field: &'static str, value: String },
}

/// A validated task name.
///
/// Task names are trimmed, non-empty and free of control characters, so they
/// survive a round trip through the line-oriented task list and the CSV log.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskName(String);

impl TaskName {
    /// Creates a new task name after validation.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "task name" });
        }
        if trimmed.chars().any(char::is_control) {
            return Err(ValidationError::ControlCharacter {
                field: "task name",
                value: name,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaskName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskName> for String {
    fn from(name: TaskName) -> Self {
        name.0
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TaskName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for TaskName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// One finalized timed work session, expressed in local wall-clock time.
///
/// The calendar day of an interval is the local date of its `begin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    task: TaskName,
    begin: NaiveDateTime,
    end: NaiveDateTime,
}

impl Interval {
    /// Creates an interval, rejecting one that ends before it begins.
    pub fn new(
        task: TaskName,
        begin: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, ReportError> {
        if end < begin {
            return Err(ReportError::InvalidValue {
                task: task.to_string(),
                duration: end - begin,
            });
        }
        Ok(Self { task, begin, end })
    }

    pub const fn task(&self) -> &TaskName {
        &self.task
    }

    pub const fn begin(&self) -> NaiveDateTime {
        self.begin
    }

    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Elapsed time between begin and end. Never negative.
    pub fn duration(&self) -> TimeDelta {
        self.end - self.begin
    }

    /// The calendar day this interval is attributed to.
    pub const fn day(&self) -> NaiveDate {
        self.begin.date()
    }

    /// Splits the interval at every local midnight it crosses.
    ///
    /// Each returned segment starts and ends on the same calendar day, except
    /// that a segment may end exactly at the following midnight. The segment
    /// durations always sum to [`Interval::duration`].
    pub fn split_by_day(&self) -> Vec<Self> {
        let mut segments = Vec::new();
        let mut begin = self.begin;

        while begin.date() < self.end.date() {
            let Some(next_day) = begin.date().succ_opt() else {
                break;
            };
            let midnight = next_day.and_time(NaiveTime::MIN);
            segments.push(Self {
                task: self.task.clone(),
                begin,
                end: midnight,
            });
            begin = midnight;
        }

        segments.push(Self {
            task: self.task.clone(),
            begin,
            end: self.end,
        });
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn task_name_rejects_empty() {
        assert!(TaskName::new("").is_err());
        assert!(TaskName::new("   ").is_err());
        assert!(TaskName::new("write").is_ok());
    }

    #[test]
    fn task_name_trims_whitespace() {
        let name = TaskName::new("  write docs ").unwrap();
        assert_eq!(name.as_str(), "write docs");
    }

    #[test]
    fn task_name_rejects_newlines() {
        let err = TaskName::new("write\ndocs").unwrap_err();
        assert!(matches!(err, ValidationError::ControlCharacter { .. }));
    }

    #[test]
    fn task_names_order_alphabetically() {
        let mut names = vec![
            TaskName::new("write").unwrap(),
            TaskName::new("email").unwrap(),
            TaskName::new("review").unwrap(),
        ];
        names.sort();
        let names: Vec<_> = names.iter().map(TaskName::as_str).collect();
        assert_eq!(names, ["email", "review", "write"]);
    }

    #[test]
    fn interval_rejects_end_before_begin() {
        let task = TaskName::new("write").unwrap();
        let err = Interval::new(task, at(27, 10, 0), at(27, 9, 0)).unwrap_err();
        assert!(matches!(err, ReportError::InvalidValue { .. }));
    }

    #[test]
    fn interval_within_one_day_is_not_split() {
        let task = TaskName::new("write").unwrap();
        let interval = Interval::new(task, at(27, 9, 0), at(27, 10, 30)).unwrap();

        let segments = interval.split_by_day();
        assert_eq!(segments, vec![interval.clone()]);
        assert_eq!(interval.duration(), TimeDelta::minutes(90));
    }

    #[test]
    fn interval_spanning_midnight_is_split_per_day() {
        let task = TaskName::new("deploy").unwrap();
        let interval = Interval::new(task, at(27, 23, 0), at(29, 1, 30)).unwrap();

        let segments = interval.split_by_day();
        let days: Vec<_> = segments.iter().map(Interval::day).collect();
        let durations: Vec<_> = segments.iter().map(Interval::duration).collect();

        assert_eq!(
            days,
            vec![
                NaiveDate::from_ymd_opt(2025, 1, 27).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 28).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 29).unwrap(),
            ]
        );
        assert_eq!(
            durations,
            vec![
                TimeDelta::hours(1),
                TimeDelta::hours(24),
                TimeDelta::minutes(90)
            ]
        );
        let total: TimeDelta = durations.into_iter().sum();
        assert_eq!(total, interval.duration());
    }

    #[test]
    fn interval_ending_at_midnight_leaves_empty_tail() {
        let task = TaskName::new("write").unwrap();
        let interval = Interval::new(task, at(27, 23, 0), at(28, 0, 0)).unwrap();

        let segments = interval.split_by_day();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].duration(), TimeDelta::hours(1));
        assert_eq!(segments[1].duration(), TimeDelta::zero());
    }
}
