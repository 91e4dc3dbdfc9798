//! Per-task duration accumulation for one aggregation scope.
//!
//! A [`TaskDurations`] maps task names to accumulated elapsed time and keeps a
//! running total. The raw mapping is never exposed mutably, so every change
//! goes through [`TaskDurations::set`] or [`TaskDurations::remove`] and the
//! total always equals the sum of the stored durations.

use std::fmt;

use chrono::TimeDelta;

use crate::error::ReportError;
use crate::types::TaskName;

/// Accumulated time per task plus their sum, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDurations {
    tasks: Vec<(TaskName, TimeDelta)>,
    total: TimeDelta,
}

impl Default for TaskDurations {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskDurations {
    pub const fn new() -> Self {
        Self {
            tasks: Vec::new(),
            total: TimeDelta::zero(),
        }
    }

    fn position(&self, task: &TaskName) -> Option<usize> {
        self.tasks.iter().position(|(name, _)| name == task)
    }

    /// Replaces the task's duration, keeping the total consistent.
    ///
    /// Fails with [`ReportError::InvalidValue`] for negative durations or when
    /// the new total would overflow. Nothing is modified on failure.
    pub fn set(&mut self, task: TaskName, duration: TimeDelta) -> Result<(), ReportError> {
        let invalid = || ReportError::InvalidValue {
            task: task.to_string(),
            duration,
        };
        if duration < TimeDelta::zero() {
            return Err(invalid());
        }

        match self.position(&task) {
            Some(index) => {
                let total = self
                    .total
                    .checked_sub(&self.tasks[index].1)
                    .and_then(|rest| rest.checked_add(&duration))
                    .ok_or_else(invalid)?;
                self.tasks[index].1 = duration;
                self.total = total;
            }
            None => {
                let total = self.total.checked_add(&duration).ok_or_else(invalid)?;
                self.tasks.push((task, duration));
                self.total = total;
            }
        }
        Ok(())
    }

    /// Adds `duration` to whatever the task already has.
    ///
    /// Reads the stored time directly instead of going through [`Self::get`],
    /// so a scope whose total is still zero can keep accumulating.
    pub fn add(&mut self, task: &TaskName, duration: TimeDelta) -> Result<(), ReportError> {
        let accumulated = match self.time(task) {
            Ok(current) => current
                .checked_add(&duration)
                .ok_or_else(|| ReportError::InvalidValue {
                    task: task.to_string(),
                    duration,
                })?,
            Err(_) => duration,
        };
        self.set(task.clone(), accumulated)
    }

    /// Removes the task, subtracting its duration from the total.
    pub fn remove(&mut self, task: &TaskName) -> Result<TimeDelta, ReportError> {
        let index = self.position(task).ok_or_else(|| ReportError::NotFound {
            task: task.to_string(),
        })?;
        let (_, duration) = self.tasks.remove(index);
        self.total -= duration;
        Ok(duration)
    }

    /// Returns the task's accumulated time and its share of the total.
    pub fn get(&self, task: &TaskName) -> Result<Entry, ReportError> {
        let time = self.time(task)?;
        if self.total.is_zero() {
            return Err(ReportError::DivisionUndefined);
        }
        Ok(Entry {
            time,
            percent: Percent {
                part: time,
                whole: self.total,
            },
        })
    }

    /// Returns the task's accumulated time.
    pub fn time(&self, task: &TaskName) -> Result<TimeDelta, ReportError> {
        self.position(task)
            .map(|index| self.tasks[index].1)
            .ok_or_else(|| ReportError::NotFound {
                task: task.to_string(),
            })
    }

    pub fn contains(&self, task: &TaskName) -> bool {
        self.position(task).is_some()
    }

    pub const fn total(&self) -> TimeDelta {
        self.total
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterates tasks in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&TaskName, TimeDelta)> {
        self.tasks.iter().map(|(name, time)| (name, *time))
    }
}

/// Read-only view of one task's accumulated time and its share of the scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub time: TimeDelta,
    pub percent: Percent,
}

/// A share of a scope's total, computed on demand from raw durations.
///
/// Displays as the floored integer percentage, except that a nonzero share
/// that floors to zero displays as `<1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Percent {
    part: TimeDelta,
    whole: TimeDelta,
}

impl Percent {
    /// The share as a fraction in `[0, 1]`.
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        nanos(self.part) as f64 / nanos(self.whole) as f64
    }

    /// `floor(fraction * 100)`, computed in integer arithmetic.
    #[allow(clippy::cast_possible_truncation)]
    pub fn floor(&self) -> i64 {
        (nanos(self.part) * 100 / nanos(self.whole)) as i64
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let floor = self.floor();
        if floor == 0 && !self.part.is_zero() {
            write!(f, "<1")
        } else {
            write!(f, "{floor}")
        }
    }
}

fn nanos(delta: TimeDelta) -> i128 {
    i128::from(delta.num_seconds()) * 1_000_000_000 + i128::from(delta.subsec_nanos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str) -> TaskName {
        TaskName::new(name).unwrap()
    }

    fn sum(durations: &TaskDurations) -> TimeDelta {
        durations.iter().map(|(_, time)| time).sum()
    }

    #[test]
    fn set_tracks_total() {
        let mut durations = TaskDurations::new();
        durations.set(task("write"), TimeDelta::minutes(90)).unwrap();
        durations.set(task("email"), TimeDelta::minutes(30)).unwrap();

        assert_eq!(durations.total(), TimeDelta::hours(2));
        assert_eq!(durations.total(), sum(&durations));
    }

    #[test]
    fn set_replaces_existing_duration() {
        let mut durations = TaskDurations::new();
        durations.set(task("write"), TimeDelta::minutes(90)).unwrap();
        durations.set(task("write"), TimeDelta::minutes(10)).unwrap();

        assert_eq!(durations.len(), 1);
        assert_eq!(durations.total(), TimeDelta::minutes(10));
    }

    #[test]
    fn set_rejects_negative_without_mutation() {
        let mut durations = TaskDurations::new();
        durations.set(task("write"), TimeDelta::minutes(90)).unwrap();

        let err = durations
            .set(task("write"), TimeDelta::minutes(-5))
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidValue { .. }));
        assert_eq!(durations.total(), TimeDelta::minutes(90));
        assert_eq!(durations.time(&task("write")).unwrap(), TimeDelta::minutes(90));
    }

    #[test]
    fn set_rejects_overflowing_total() {
        let mut durations = TaskDurations::new();
        durations.set(task("write"), TimeDelta::MAX).unwrap();

        let err = durations
            .set(task("email"), TimeDelta::seconds(1))
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidValue { .. }));
        assert!(!durations.contains(&task("email")));
        assert_eq!(durations.total(), TimeDelta::MAX);
    }

    #[test]
    fn add_accumulates() {
        let mut durations = TaskDurations::new();
        durations.add(&task("write"), TimeDelta::minutes(90)).unwrap();
        durations.add(&task("email"), TimeDelta::minutes(30)).unwrap();
        durations.add(&task("write"), TimeDelta::minutes(30)).unwrap();

        assert_eq!(durations.time(&task("write")).unwrap(), TimeDelta::hours(2));
        assert_eq!(durations.total(), TimeDelta::minutes(150));
    }

    #[test]
    fn add_works_while_total_is_zero() {
        let mut durations = TaskDurations::new();
        durations.add(&task("write"), TimeDelta::zero()).unwrap();
        durations.add(&task("write"), TimeDelta::minutes(5)).unwrap();

        assert_eq!(durations.total(), TimeDelta::minutes(5));
    }

    #[test]
    fn remove_subtracts_from_total() {
        let mut durations = TaskDurations::new();
        durations.set(task("write"), TimeDelta::minutes(90)).unwrap();
        durations.set(task("email"), TimeDelta::minutes(30)).unwrap();

        let removed = durations.remove(&task("write")).unwrap();
        assert_eq!(removed, TimeDelta::minutes(90));
        assert_eq!(durations.total(), TimeDelta::minutes(30));
        assert!(!durations.contains(&task("write")));
    }

    #[test]
    fn remove_missing_task_is_not_found() {
        let mut durations = TaskDurations::new();
        let err = durations.remove(&task("write")).unwrap_err();
        assert_eq!(
            err,
            ReportError::NotFound {
                task: "write".to_string()
            }
        );
    }

    #[test]
    fn get_missing_task_is_not_found() {
        let mut durations = TaskDurations::new();
        durations.set(task("write"), TimeDelta::minutes(1)).unwrap();
        assert!(matches!(
            durations.get(&task("email")),
            Err(ReportError::NotFound { .. })
        ));
    }

    #[test]
    fn get_on_fresh_accumulator_is_not_found() {
        let durations = TaskDurations::new();
        assert_eq!(
            durations.get(&task("write")),
            Err(ReportError::NotFound {
                task: "write".to_string()
            })
        );
    }

    #[test]
    fn get_on_zero_total_is_division_undefined() {
        let mut durations = TaskDurations::new();
        durations.set(task("write"), TimeDelta::zero()).unwrap();
        assert_eq!(
            durations.get(&task("write")),
            Err(ReportError::DivisionUndefined)
        );
    }

    #[test]
    fn get_returns_time_and_percent() {
        let mut durations = TaskDurations::new();
        durations.set(task("write"), TimeDelta::minutes(90)).unwrap();
        durations.set(task("email"), TimeDelta::minutes(30)).unwrap();

        let entry = durations.get(&task("write")).unwrap();
        assert_eq!(entry.time, TimeDelta::minutes(90));
        assert_eq!(entry.percent.floor(), 75);
        assert!((entry.percent.fraction() - 0.75).abs() < f64::EPSILON);
        assert_eq!(entry.percent.to_string(), "75");
    }

    #[test]
    fn percent_follows_later_changes_to_total() {
        let mut durations = TaskDurations::new();
        durations.set(task("write"), TimeDelta::hours(1)).unwrap();
        assert_eq!(durations.get(&task("write")).unwrap().percent.floor(), 100);

        durations.set(task("email"), TimeDelta::hours(3)).unwrap();
        assert_eq!(durations.get(&task("write")).unwrap().percent.floor(), 25);
    }

    #[test]
    fn percent_floors() {
        let mut durations = TaskDurations::new();
        durations.set(task("a"), TimeDelta::seconds(2)).unwrap();
        durations.set(task("b"), TimeDelta::seconds(1)).unwrap();

        assert_eq!(durations.get(&task("a")).unwrap().percent.to_string(), "66");
        assert_eq!(durations.get(&task("b")).unwrap().percent.to_string(), "33");
    }

    #[test]
    fn percent_below_one_renders_as_less_than_one() {
        let mut durations = TaskDurations::new();
        durations.set(task("write"), TimeDelta::hours(10)).unwrap();
        durations.set(task("email"), TimeDelta::minutes(1)).unwrap();

        let entry = durations.get(&task("email")).unwrap();
        assert_eq!(entry.percent.floor(), 0);
        assert_eq!(entry.percent.to_string(), "<1");
    }

    #[test]
    fn zero_share_renders_as_zero() {
        let mut durations = TaskDurations::new();
        durations.set(task("write"), TimeDelta::hours(1)).unwrap();
        durations.set(task("email"), TimeDelta::zero()).unwrap();

        assert_eq!(durations.get(&task("email")).unwrap().percent.to_string(), "0");
    }

    #[test]
    fn entries_reconstruct_total_from_raw_durations() {
        let mut durations = TaskDurations::new();
        durations.set(task("a"), TimeDelta::seconds(7)).unwrap();
        durations.set(task("b"), TimeDelta::seconds(11)).unwrap();
        durations.set(task("c"), TimeDelta::seconds(13)).unwrap();

        let entries: Vec<Entry> = durations
            .iter()
            .map(|(name, _)| durations.get(name).unwrap())
            .collect();
        let time: TimeDelta = entries.iter().map(|entry| entry.time).sum();
        let fraction: f64 = entries.iter().map(|entry| entry.percent.fraction()).sum();

        assert_eq!(time, durations.total());
        assert!((fraction - 1.0).abs() < 1e-9);
    }

    #[test]
    fn iter_preserves_first_seen_order() {
        let mut durations = TaskDurations::new();
        durations.add(&task("write"), TimeDelta::minutes(1)).unwrap();
        durations.add(&task("email"), TimeDelta::minutes(1)).unwrap();
        durations.add(&task("write"), TimeDelta::minutes(1)).unwrap();

        let names: Vec<_> = durations.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["write", "email"]);
    }
}
