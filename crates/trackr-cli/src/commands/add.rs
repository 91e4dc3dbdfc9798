//! Add command for registering tasks.

use std::io::Write;

use anyhow::Result;

use crate::Config;
use crate::commands::{open_store, parse_task};

pub fn run<W: Write>(writer: &mut W, task: &str, config: &Config) -> Result<()> {
    let task = parse_task(task)?;
    let store = open_store(config)?;

    if store.add_task(&task)? {
        writeln!(writer, "Task {task} added to tasklist.")?;
    } else {
        writeln!(writer, "Task {task} is already in the tasklist")?;
    }
    Ok(())
}
