//! Fixed-width text table rendering.
//!
//! Lines are `|`-delimited rows of centered cells. Borders use `+` between
//! dash-filled cells of the same width, so a header, its rows and its borders
//! line up as long as every line is rendered against the same task sequence.

use crate::error::ReportError;
use crate::report::Bucket;
use crate::types::TaskName;

/// Default width of one table cell, in characters.
pub const DEFAULT_CELL_WIDTH: usize = 14;

/// Default number of blank cells reserved ahead of the task columns.
pub const DEFAULT_LEADING_OFFSET: usize = 1;

/// Cell geometry shared by every line of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub cell_width: usize,
    /// Blank header cells before the task columns (the row-title column).
    pub leading_offset: usize,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            leading_offset: DEFAULT_LEADING_OFFSET,
        }
    }
}

/// Centers `text` in a cell of `width` characters.
///
/// Odd padding goes to the right. Text wider than the cell is cut to fit.
pub fn center(text: &str, width: usize) -> String {
    let text: String = text.chars().take(width).collect();
    format!("{text:^width$}")
}

fn line(cells: &[String]) -> String {
    format!("|{}|", cells.join("|"))
}

fn border(columns: usize, width: usize) -> String {
    let dashes = vec!["-".repeat(width); columns];
    format!("+{}+", dashes.join("+"))
}

/// Header line of task names followed by a separator line.
pub fn report_header(task_names: &[TaskName], cell_width: usize, leading_offset: usize) -> String {
    let cells: Vec<String> = std::iter::repeat_n(center("", cell_width), leading_offset)
        .chain(task_names.iter().map(|name| center(name.as_str(), cell_width)))
        .collect();
    format!("{}\n{}", line(&cells), border(cells.len(), cell_width))
}

fn task_cells(
    bucket: &Bucket,
    task_names: &[TaskName],
    cell_width: usize,
) -> Result<Vec<String>, ReportError> {
    task_names
        .iter()
        .map(|name| -> Result<String, ReportError> {
            if bucket.durations().contains(name) {
                let entry = bucket.durations().get(name)?;
                Ok(center(&format!("{}%", entry.percent), cell_width))
            } else {
                Ok(center("", cell_width))
            }
        })
        .collect()
}

/// One row of percentages, led by the bucket's title cell when it has one.
pub fn report_row(
    bucket: &Bucket,
    task_names: &[TaskName],
    cell_width: usize,
) -> Result<String, ReportError> {
    let mut cells: Vec<String> = bucket
        .title()
        .map(|title| center(title, cell_width))
        .into_iter()
        .collect();
    cells.extend(task_cells(bucket, task_names, cell_width)?);
    Ok(line(&cells))
}

/// Totals row: title cell, then `leading_offset` blank cells, then the task cells.
///
/// With `with_bottom_border`, a closing dashed line spanning the same columns follows.
pub fn report_totals(
    bucket: &Bucket,
    task_names: &[TaskName],
    cell_width: usize,
    leading_offset: usize,
    with_bottom_border: bool,
) -> Result<String, ReportError> {
    let mut cells: Vec<String> = bucket
        .title()
        .map(|title| center(title, cell_width))
        .into_iter()
        .collect();
    cells.extend(std::iter::repeat_n(center("", cell_width), leading_offset));
    cells.extend(task_cells(bucket, task_names, cell_width)?);

    let row = line(&cells);
    if with_bottom_border {
        Ok(format!("{row}\n{}", border(cells.len(), cell_width)))
    } else {
        Ok(row)
    }
}
