//! Storage layer for the trackr time tracker.
//!
//! Everything lives in flat files under one data directory.
//!
//! # Layout
//!
//! - `time.csv`: finalized intervals, header `task,begin,end`, append-only
//! - `current.csv`: the running task (same header, `end` left empty); absent when idle
//! - `tasks.txt`: registered task names, one per line
//!
//! ## Timestamp Format
//!
//! Timestamps are stored in UTC as RFC 3339 strings (e.g., `2025-01-27T09:00:00Z`),
//! which is what `chrono::DateTime<Utc>` serializes to. Conversion to local
//! wall-clock time happens only when intervals are handed to the report engine.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use trackr_core::{Interval, ReportError, TaskName, ValidationError};

const LOG_FILE: &str = "time.csv";
const CURRENT_FILE: &str = "current.csv";
const TASKS_FILE: &str = "tasks.txt";
const LOG_HEADER: [&str; 3] = ["task", "begin", "end"];

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A CSV file could not be read or written.
    #[error("malformed csv in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    /// A line of the task list is not a valid task name.
    #[error("invalid task on line {line} of {path}: {source}")]
    InvalidTask {
        path: PathBuf,
        line: usize,
        #[source]
        source: ValidationError,
    },
    /// A logged interval has no end timestamp.
    #[error("interval {row} in {path} has no end")]
    MissingEnd { path: PathBuf, row: usize },
    /// A logged interval ends before it begins.
    #[error("interval {row} in {path} is invalid: {source}")]
    InvalidInterval {
        path: PathBuf,
        row: usize,
        #[source]
        source: ReportError,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> StoreError {
    move |source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// One row of `time.csv` or `current.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LogRow {
    task: TaskName,
    begin: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
}

/// The task currently being timed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningTask {
    pub task: TaskName,
    pub begin: DateTime<Utc>,
}

/// A finalized interval as stored in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedInterval {
    pub task: TaskName,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl LoggedInterval {
    /// Converts to a report interval in the given timezone.
    ///
    /// The local end is derived from the local begin plus the elapsed time, so
    /// DST transitions never shorten or invert an interval.
    pub fn to_local<Tz: TimeZone>(&self, tz: &Tz) -> Result<Interval, ReportError> {
        let begin: NaiveDateTime = self.begin.with_timezone(tz).naive_local();
        let end = begin + (self.end - self.begin);
        Interval::new(self.task.clone(), begin, end)
    }
}

/// Flat-file store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Opens the store, creating the directory and file layout if necessary.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir).map_err(io_error(dir))?;
        let store = Self {
            dir: dir.to_path_buf(),
        };
        store.init()?;
        Ok(store)
    }

    /// Writes the log header and an empty task list on first use.
    ///
    /// This is idempotent - existing files are left untouched.
    fn init(&self) -> Result<(), StoreError> {
        let log = self.log_path();
        if !log.exists() {
            tracing::debug!(path = %log.display(), "creating interval log");
            let mut writer = csv::Writer::from_path(&log).map_err(csv_error(&log))?;
            writer.write_record(LOG_HEADER).map_err(csv_error(&log))?;
            writer.flush().map_err(io_error(&log))?;
        }

        let tasks = self.tasks_path();
        if !tasks.exists() {
            tracing::debug!(path = %tasks.display(), "creating task list");
            fs::write(&tasks, "").map_err(io_error(&tasks))?;
        }
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE)
    }

    pub fn current_path(&self) -> PathBuf {
        self.dir.join(CURRENT_FILE)
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.dir.join(TASKS_FILE)
    }

    // ========== Task List ==========

    /// Lists registered tasks in registration order, skipping blank lines.
    pub fn tasks(&self) -> Result<Vec<TaskName>, StoreError> {
        let path = self.tasks_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(io_error(&path)(e)),
        };

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                TaskName::new(line).map_err(|source| StoreError::InvalidTask {
                    path: path.clone(),
                    line: index + 1,
                    source,
                })
            })
            .collect()
    }

    pub fn has_task(&self, task: &TaskName) -> Result<bool, StoreError> {
        Ok(self.tasks()?.contains(task))
    }

    /// Registers a task. Returns `false` if it was already registered.
    pub fn add_task(&self, task: &TaskName) -> Result<bool, StoreError> {
        if self.has_task(task)? {
            return Ok(false);
        }
        let path = self.tasks_path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_error(&path))?;
        writeln!(file, "{task}").map_err(io_error(&path))?;
        tracing::debug!(%task, "registered task");
        Ok(true)
    }

    // ========== Current Task ==========

    /// Returns the running task, if any.
    pub fn current(&self) -> Result<Option<RunningTask>, StoreError> {
        let path = self.current_path();
        if !path.exists() {
            return Ok(None);
        }
        let mut reader = csv::Reader::from_path(&path).map_err(csv_error(&path))?;
        let row = reader
            .deserialize::<LogRow>()
            .next()
            .transpose()
            .map_err(csv_error(&path))?;
        Ok(row.map(|row| RunningTask {
            task: row.task,
            begin: row.begin,
        }))
    }

    /// Starts timing `task`, first stopping whatever was running.
    ///
    /// Returns the interval that was stopped, if any.
    pub fn start(
        &self,
        task: &TaskName,
        now: DateTime<Utc>,
    ) -> Result<Option<LoggedInterval>, StoreError> {
        let stopped = self.stop(now)?;

        let path = self.current_path();
        let mut writer = csv::Writer::from_path(&path).map_err(csv_error(&path))?;
        writer
            .serialize(LogRow {
                task: task.clone(),
                begin: now,
                end: None,
            })
            .map_err(csv_error(&path))?;
        writer.flush().map_err(io_error(&path))?;
        tracing::debug!(%task, begin = %now, "started task");

        Ok(stopped)
    }

    /// Finalizes the running task into the log.
    ///
    /// An end earlier than the begin (clock skew) is clamped to the begin.
    pub fn stop(&self, now: DateTime<Utc>) -> Result<Option<LoggedInterval>, StoreError> {
        let Some(running) = self.current()? else {
            return Ok(None);
        };

        let end = if now < running.begin {
            tracing::warn!(task = %running.task, begin = %running.begin, %now, "stop precedes start, clamping");
            running.begin
        } else {
            now
        };
        let interval = LoggedInterval {
            task: running.task,
            begin: running.begin,
            end,
        };
        self.append(&interval)?;

        let path = self.current_path();
        fs::remove_file(&path).map_err(io_error(&path))?;
        tracing::debug!(task = %interval.task, end = %interval.end, "stopped task");
        Ok(Some(interval))
    }

    fn append(&self, interval: &LoggedInterval) -> Result<(), StoreError> {
        let path = self.log_path();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_error(&path))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .serialize(LogRow {
                task: interval.task.clone(),
                begin: interval.begin,
                end: Some(interval.end),
            })
            .map_err(csv_error(&path))?;
        writer.flush().map_err(io_error(&path))?;
        Ok(())
    }

    // ========== Interval Log ==========

    /// Lists every logged interval in file order.
    pub fn intervals(&self) -> Result<Vec<LoggedInterval>, StoreError> {
        let path = self.log_path();
        let mut reader = csv::Reader::from_path(&path).map_err(csv_error(&path))?;

        let mut intervals = Vec::new();
        for (index, row) in reader.deserialize::<LogRow>().enumerate() {
            let row = row.map_err(csv_error(&path))?;
            let end = row.end.ok_or_else(|| StoreError::MissingEnd {
                path: path.clone(),
                row: index + 1,
            })?;
            if end < row.begin {
                return Err(StoreError::InvalidInterval {
                    path: path.clone(),
                    row: index + 1,
                    source: ReportError::InvalidValue {
                        task: row.task.to_string(),
                        duration: end - row.begin,
                    },
                });
            }
            intervals.push(LoggedInterval {
                task: row.task,
                begin: row.begin,
                end,
            });
        }
        Ok(intervals)
    }

    /// Lists intervals beginning within a time range, in local time.
    ///
    /// The range is inclusive of `start` and exclusive of `end`. An interval
    /// running past `end` is cut off there. Results are sorted by begin.
    pub fn intervals_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Interval>, StoreError> {
        self.intervals_between_in(start, end, &Local)
    }

    /// Like [`Store::intervals_between`], converting to the given timezone.
    pub fn intervals_between_in<Tz: TimeZone>(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        tz: &Tz,
    ) -> Result<Vec<Interval>, StoreError> {
        let path = self.log_path();
        // Keep the 1-based data row of time.csv for error reporting
        let mut logged: Vec<(usize, LoggedInterval)> = self
            .intervals()?
            .into_iter()
            .enumerate()
            .filter(|(_, interval)| interval.begin >= start && interval.begin < end)
            .map(|(index, mut interval)| {
                interval.end = interval.end.min(end);
                (index + 1, interval)
            })
            .collect();
        logged.sort_by_key(|(_, interval)| interval.begin);
        tracing::debug!(%start, %end, count = logged.len(), "loaded intervals");

        logged
            .iter()
            .map(|(row, interval)| {
                interval
                    .to_local(tz)
                    .map_err(|source| StoreError::InvalidInterval {
                        path: path.clone(),
                        row: *row,
                        source,
                    })
            })
            .collect()
    }
}
