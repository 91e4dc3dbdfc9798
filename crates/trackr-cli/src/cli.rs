//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::report::ReportArgs;
use crate::commands::start::StartArgs;

/// Personal time tracker.
///
/// Declare tasks, start and stop timing them, and print a weekly table of
/// where the time went.
#[derive(Debug, Parser)]
#[command(name = "trackr", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Register a new task.
    Add {
        /// Name of the task.
        task: String,
    },

    /// Begin working on a task, ending the task in progress, if any.
    Start(StartArgs),

    /// Stop the task in progress.
    Stop,

    /// List all known tasks.
    Tasks,

    /// Show the task in progress.
    Current,

    /// Print a weekly report of how much time went where.
    Report(ReportArgs),
}
