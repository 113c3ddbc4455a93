//! The `show` command: one full recomputation per invocation.
//!
//! Mirrors what a dashboard does on every widget change: load, compile the
//! mask from the explicit selections, project, render, report the match
//! count. Warnings reach the user through the log; they never abort the
//! evaluation.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::{info, warn};

use crate::{
    board::{Board, SortSpec},
    cli::ShowArgs,
    dataset::Dataset,
    io_utils, mask,
    project::{self, DisplayTable},
    selection::Selections,
    table,
};

pub fn execute(args: &ShowArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let board = Board::load(&args.board)
        .with_context(|| format!("Loading board from {:?}", args.board))?;
    let dataset = Dataset::from_csv(&args.input, &board, delimiter, encoding)
        .with_context(|| format!("Loading dataset from {:?}", args.input))?;

    if dataset.is_empty() {
        println!("No data available. Check the dataset source and try again.");
        return Ok(());
    }

    let selections = Selections::from_args(
        args.selections.as_deref(),
        &args.selects,
        &args.ranges,
        &args.flags,
    )?;
    let sort_override = args
        .sort
        .as_deref()
        .map(parse_sort_directive)
        .transpose()?;

    let outcome = mask::compile_mask(&dataset, &board, &selections);
    let projection = project::project(
        &dataset,
        &outcome.mask,
        &board,
        sort_override.as_ref(),
        args.limit,
    );

    for warning in outcome.warnings.iter().chain(projection.warnings.iter()) {
        warn!("{warning}");
    }

    match args.output.as_deref() {
        Some(path) => {
            write_csv(path, delimiter, &projection.table)?;
            info!(
                "Wrote {} of {} matching row(s) to {:?}",
                projection.table.row_count(),
                projection.match_count,
                path
            );
        }
        None => {
            if let Some(title) = board.title.as_deref() {
                println!("{title}");
                println!();
            }
            if projection.table.column_count() == 0 {
                println!("No displayable columns for this dataset.");
            } else {
                table::print_display_table(&projection.table);
            }
            println!();
            println!("Found {} matching products", projection.match_count);
        }
    }
    Ok(())
}

/// CSV export carries the underlying URL for link cells, not the label.
fn write_csv(path: &Path, delimiter: u8, table: &DisplayTable) -> Result<()> {
    let mut writer = io_utils::open_csv_writer(Some(path), delimiter)?;
    writer
        .write_record(table.headers.iter())
        .context("Writing output headers")?;
    for row in &table.rows {
        let record: Vec<&str> = row
            .iter()
            .map(|cell| cell.href.as_deref().unwrap_or(cell.text.as_str()))
            .collect();
        writer.write_record(record).context("Writing output row")?;
    }
    writer.flush().context("Flushing output")?;
    Ok(())
}

fn parse_sort_directive(spec: &str) -> Result<SortSpec> {
    let mut parts = spec.split(':');
    let column = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("Sort directive is missing a column"))?;
    let direction = parts.next().unwrap_or("asc");
    let descending = match direction.to_ascii_lowercase().as_str() {
        "asc" => false,
        "desc" => true,
        other => {
            return Err(anyhow!("Unknown sort direction '{other}'"));
        }
    };
    Ok(SortSpec {
        column: column.to_string(),
        descending,
    })
}
