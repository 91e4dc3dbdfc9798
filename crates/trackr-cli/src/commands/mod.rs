//! CLI subcommand implementations.

pub mod add;
pub mod current;
pub mod report;
pub mod start;
pub mod stop;
pub mod tasks;
pub mod util;

use anyhow::{Context, Result};
use trackr_store::Store;

use crate::Config;

/// Opens the flat-file store named by the configuration.
pub fn open_store(config: &Config) -> Result<Store> {
    Store::open(&config.data_dir)
        .with_context(|| format!("failed to open data directory {}", config.data_dir.display()))
}

/// Parses a task name given on the command line.
pub fn parse_task(task: &str) -> Result<trackr_core::TaskName> {
    trackr_core::TaskName::new(task).with_context(|| format!("invalid task name {task:?}"))
}
