//! Weekly report builder.
//!
//! Folds an ordered sequence of intervals into one bucket per calendar day
//! plus a bucket for the whole window, then renders them as a table:
//!
//! 1. Split every interval at local midnight so each segment belongs to one day
//! 2. Walk segments in begin order, closing the day bucket whenever the date changes
//! 3. Accumulate each segment into its day bucket and the totals bucket
//! 4. Render the task header, one row per day, then the totals row

use std::collections::BTreeSet;

use chrono::{NaiveDate, TimeDelta};

use crate::accumulator::TaskDurations;
use crate::error::ReportError;
use crate::table::{TableLayout, report_header, report_row, report_totals};
use crate::types::{Interval, TaskName};

/// Notice printed instead of a table when the window holds no intervals.
pub const NO_DATA_NOTICE: &str = "No data to report!";

/// Title of the bucket spanning the whole report window.
pub const TOTALS_TITLE: &str = "TOTAL";

/// An aggregation scope: one day, or the whole report window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bucket {
    title: Option<String>,
    durations: TaskDurations,
}

impl Bucket {
    pub const fn new(title: Option<String>) -> Self {
        Self {
            title,
            durations: TaskDurations::new(),
        }
    }

    /// A bucket for one calendar day, titled like `Mon 01/27`.
    pub fn for_day(day: NaiveDate) -> Self {
        Self::new(Some(day_title(day)))
    }

    /// The bucket covering the whole report window.
    pub fn totals() -> Self {
        Self::new(Some(TOTALS_TITLE.to_string()))
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub const fn durations(&self) -> &TaskDurations {
        &self.durations
    }

    pub const fn total(&self) -> TimeDelta {
        self.durations.total()
    }

    /// Folds `duration` into the task's accumulated time.
    pub fn add(&mut self, task: &TaskName, duration: TimeDelta) -> Result<(), ReportError> {
        self.durations.add(task, duration)
    }
}

/// Formats a day title: weekday abbreviation plus month/day.
pub fn day_title(day: NaiveDate) -> String {
    day.format("%a %m/%d").to_string()
}

/// Single-pass state machine over intervals sorted by begin.
#[derive(Debug)]
pub struct ReportBuilder {
    current_day: Option<NaiveDate>,
    day_bucket: Option<Bucket>,
    totals: Bucket,
    completed_days: Vec<Bucket>,
    task_header: BTreeSet<TaskName>,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self {
            current_day: None,
            day_bucket: None,
            totals: Bucket::totals(),
            completed_days: Vec::new(),
            task_header: BTreeSet::new(),
        }
    }

    /// Folds one interval into the report.
    ///
    /// Intervals crossing midnight are attributed to each day they touch.
    /// Zero-length segments carry no time and are skipped.
    pub fn push(&mut self, interval: &Interval) -> Result<(), ReportError> {
        for segment in interval.split_by_day() {
            if segment.duration().is_zero() {
                tracing::debug!(task = %segment.task(), begin = %segment.begin(), "skipping empty segment");
                continue;
            }
            self.push_segment(&segment)?;
        }
        Ok(())
    }

    fn push_segment(&mut self, segment: &Interval) -> Result<(), ReportError> {
        let day = segment.day();
        self.task_header.insert(segment.task().clone());

        if self.current_day != Some(day) {
            if let Some(finished) = self.day_bucket.take() {
                tracing::debug!(day = ?self.current_day, total = %finished.total(), "closing day bucket");
                self.completed_days.push(finished);
            }
            self.current_day = Some(day);
        }

        let day_bucket = self.day_bucket.get_or_insert_with(|| Bucket::for_day(day));
        day_bucket.add(segment.task(), segment.duration())?;
        self.totals.add(segment.task(), segment.duration())
    }

    /// Closes the last day bucket. Returns `None` when nothing was accumulated.
    pub fn finish(mut self) -> Option<Report> {
        if let Some(finished) = self.day_bucket.take() {
            self.completed_days.push(finished);
        }
        if self.completed_days.is_empty() {
            return None;
        }
        Some(Report {
            task_header: self.task_header.into_iter().collect(),
            days: self.completed_days,
            totals: self.totals,
        })
    }
}

/// Aggregated report, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    task_header: Vec<TaskName>,
    days: Vec<Bucket>,
    totals: Bucket,
}

impl Report {
    /// Builds a report from intervals, sorting them by begin first.
    ///
    /// Returns `Ok(None)` when there is nothing to report.
    pub fn build(intervals: &[Interval]) -> Result<Option<Self>, ReportError> {
        let mut ordered: Vec<&Interval> = intervals.iter().collect();
        ordered.sort_by_key(|interval| interval.begin());

        let mut builder = ReportBuilder::new();
        for interval in ordered {
            builder.push(interval)?;
        }
        let report = builder.finish();
        tracing::debug!(
            intervals = intervals.len(),
            days = report.as_ref().map_or(0, |r| r.days.len()),
            "built report"
        );
        Ok(report)
    }

    /// Task names defining the table columns, sorted.
    pub fn task_header(&self) -> &[TaskName] {
        &self.task_header
    }

    pub fn days(&self) -> &[Bucket] {
        &self.days
    }

    pub const fn totals(&self) -> &Bucket {
        &self.totals
    }

    /// Renders header, day rows and totals as newline-joined table lines.
    ///
    /// The totals row carries its own title cell, which takes the place of one
    /// of the header's leading blank cells so the task columns stay aligned.
    pub fn render(&self, layout: &TableLayout) -> Result<String, ReportError> {
        let width = layout.cell_width;
        let mut lines = vec![report_header(
            &self.task_header,
            width,
            layout.leading_offset,
        )];
        for day in &self.days {
            lines.push(report_row(day, &self.task_header, width)?);
        }

        let totals_offset = if self.totals.title().is_some() {
            layout.leading_offset.saturating_sub(1)
        } else {
            layout.leading_offset
        };
        lines.push(report_totals(
            &self.totals,
            &self.task_header,
            width,
            totals_offset,
            true,
        )?);

        Ok(lines.join("\n") + "\n")
    }
}

/// Builds and renders the report, or the no-data notice for an empty window.
pub fn show_report(intervals: &[Interval], layout: &TableLayout) -> Result<String, ReportError> {
    match Report::build(intervals)? {
        Some(report) => report.render(layout),
        None => Ok(format!("{NO_DATA_NOTICE}\n")),
    }
}
