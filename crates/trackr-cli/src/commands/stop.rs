//! Stop command for finalizing the running task.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::Config;
use crate::commands::open_store;

pub fn run<W: Write>(writer: &mut W, config: &Config, now: DateTime<Utc>) -> Result<()> {
    match open_store(config)?.stop(now)? {
        Some(stopped) => writeln!(writer, "Task {} stopped", stopped.task)?,
        None => writeln!(writer, "No task to stop.")?,
    }
    Ok(())
}
