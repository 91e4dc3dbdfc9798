//! Report command for printing the weekly table.
//!
//! `trackr report` covers the current local week (Monday 00:00 up to the next
//! Monday 00:00). `--weeks-ago N` shifts the window back N weeks, and
//! `--start`/`--end` override either bound.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Datelike, Days, Local, NaiveDate, Utc};
use clap::Args;
use trackr_core::{TableLayout, show_report};

use crate::Config;
use crate::commands::open_store;
use crate::commands::util::{local_midnight_to_utc, parse_datetime};
use crate::config::MIN_CELL_WIDTH;

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Report on the week N weeks before the current one.
    #[arg(long, default_value_t = 0)]
    pub weeks_ago: u32,

    /// Start of the window (RFC 3339, YYYY-MM-DD, or e.g. "3 days ago").
    #[arg(long)]
    pub start: Option<String>,

    /// End of the window, exclusive (same formats as --start).
    #[arg(long)]
    pub end: Option<String>,

    /// Width of each table cell.
    #[arg(long)]
    pub width: Option<usize>,
}

/// Calculates week boundaries (Mon 00:00 to next Mon 00:00 local time) as a
/// half-open interval, `weeks_ago` weeks before the week containing `today`.
pub fn week_boundaries(
    today: NaiveDate,
    weeks_ago: u32,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let days_back = u64::from(today.weekday().num_days_from_monday()) + 7 * u64::from(weeks_ago);
    let Some(monday) = today.checked_sub_days(Days::new(days_back)) else {
        bail!("--weeks-ago {weeks_ago} reaches before the earliest supported date");
    };
    let Some(next_monday) = monday.checked_add_days(Days::new(7)) else {
        bail!("--weeks-ago {weeks_ago} reaches past the latest supported date");
    };

    Ok((local_midnight_to_utc(monday), local_midnight_to_utc(next_monday)))
}

/// Resolves the report window from the arguments.
fn report_window(
    args: &ReportArgs,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let (mut start, mut end) = week_boundaries(today, args.weeks_ago)?;
    if let Some(s) = &args.start {
        start = parse_datetime(s, now).context("invalid --start")?;
    }
    if let Some(e) = &args.end {
        end = parse_datetime(e, now).context("invalid --end")?;
    }
    if end <= start {
        bail!("report window is empty: {start} is not before {end}");
    }
    Ok((start, end))
}

/// Runs the report command.
pub fn run<W: Write>(
    writer: &mut W,
    args: &ReportArgs,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<()> {
    let cell_width = args.width.unwrap_or(config.cell_width);
    if cell_width < MIN_CELL_WIDTH {
        bail!("--width must be at least {MIN_CELL_WIDTH}, got {cell_width}");
    }

    let today = now.with_timezone(&Local).date_naive();
    let (start, end) = report_window(args, today, now)?;
    tracing::debug!(%start, %end, "report window");

    let intervals = open_store(config)?.intervals_between(start, end)?;
    let layout = TableLayout {
        cell_width,
        ..TableLayout::default()
    };
    let output = show_report(&intervals, &layout).context("failed to build report")?;
    write!(writer, "{output}")?;
    Ok(())
}
