//! Current command for showing the running task.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local, TimeZone, Utc};
use trackr_store::RunningTask;

use crate::Config;
use crate::commands::open_store;
use crate::commands::util::format_duration;

pub fn run<W: Write>(writer: &mut W, config: &Config, now: DateTime<Utc>) -> Result<()> {
    match open_store(config)?.current()? {
        Some(running) => writeln!(writer, "{}", describe(&running, now, &Local))?,
        None => writeln!(writer, "No task in progress.")?,
    }
    Ok(())
}

/// One-line description of the running task, with its begin in `tz`.
fn describe<Tz: TimeZone>(running: &RunningTask, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let started = running.begin.with_timezone(tz).format("%a %m/%d %H:%M");
    let elapsed = format_duration(now - running.begin);
    format!("Current task: {} (started {started}, {elapsed} elapsed)", running.task)
}
