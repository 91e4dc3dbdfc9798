use anyhow::{Context, Result};
use chrono::{SubsecRound, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trackr_cli::commands::{add, current, report, start, stop, tasks};
use trackr_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let now = Utc::now().trunc_subsecs(0);
    let mut stdout = std::io::stdout().lock();

    match command {
        Commands::Add { task } => add::run(&mut stdout, task, &config)?,
        Commands::Start(args) => start::run(&mut stdout, args, &config, now)?,
        Commands::Stop => stop::run(&mut stdout, &config, now)?,
        Commands::Tasks => tasks::run(&mut stdout, &config)?,
        Commands::Current => current::run(&mut stdout, &config, now)?,
        Commands::Report(args) => report::run(&mut stdout, args, &config, now)?,
    }

    Ok(())
}
