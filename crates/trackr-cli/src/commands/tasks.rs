//! Tasks command for listing registered tasks.

use std::io::Write;

use anyhow::Result;

use crate::Config;
use crate::commands::open_store;

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let tasks = open_store(config)?.tasks()?;

    if tasks.is_empty() {
        writeln!(writer, "No tasks registered.")?;
        return Ok(());
    }
    for task in tasks {
        writeln!(writer, "{task}")?;
    }
    Ok(())
}
