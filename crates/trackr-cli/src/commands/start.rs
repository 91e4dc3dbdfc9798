//! Start command for timing a task.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;

use crate::Config;
use crate::commands::{open_store, parse_task};

#[derive(Debug, Args)]
pub struct StartArgs {
    /// Task to start working on.
    pub task: String,

    /// Register the task first if it is not in the tasklist.
    #[arg(short, long)]
    pub add: bool,
}

pub fn run<W: Write>(
    writer: &mut W,
    args: &StartArgs,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<()> {
    let task = parse_task(&args.task)?;
    let store = open_store(config)?;

    if !args.add && !store.has_task(&task)? {
        writeln!(
            writer,
            "Sorry: {task} is not in tasklist. Try with -a or `trackr add {task}`"
        )?;
        return Ok(());
    }

    store.add_task(&task)?;
    if let Some(stopped) = store.start(&task, now)? {
        writeln!(writer, "Note: Stopped current task {}", stopped.task)?;
    }
    writeln!(writer, "Task {task} started.")?;
    Ok(())
}
