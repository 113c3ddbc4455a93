//! The `check` command: diagnose a board against a dataset.
//!
//! The engine degrades silently by design (inert filters, omitted columns),
//! which is right for end users and wrong for whoever maintains the board.
//! This command makes the degradations visible: every filter, display
//! column, and the sort column get a status line.

use anyhow::{Context, Result};
use log::info;

use crate::{
    board::{Board, FilterRule},
    cli::CheckArgs,
    dataset::Dataset,
    io_utils, table,
};

pub fn execute(args: &CheckArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let board = Board::load(&args.board)
        .with_context(|| format!("Loading board from {:?}", args.board))?;
    let dataset = Dataset::from_csv(&args.input, &board, delimiter, encoding)
        .with_context(|| format!("Loading dataset from {:?}", args.input))?;

    let headers = ["part", "name", "status"].map(String::from).to_vec();
    let rows = diagnose(&board, &dataset);
    table::print_table(&headers, &rows);

    let findings = rows.iter().filter(|row| row[2] != "ok").count();
    if findings == 0 {
        info!("Board matches the dataset: no findings");
    } else {
        info!("{findings} finding(s); affected filters are inert and affected columns are omitted");
    }
    Ok(())
}

pub fn diagnose(board: &Board, dataset: &Dataset) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    for filter in &board.filters {
        match &filter.rule {
            FilterRule::Features { labels } => {
                for label in labels {
                    let status = if dataset.column_index(&label.column).is_some() {
                        "ok".to_string()
                    } else {
                        format!("column '{}' missing", label.column)
                    };
                    rows.push(vec![
                        "filter".to_string(),
                        format!("{} / {}", filter.id, label.label),
                        status,
                    ]);
                }
            }
            rule => {
                let column = rule.column().expect("non-feature rules name a column");
                let status = if dataset.column_index(column).is_none() {
                    format!("column '{column}' missing")
                } else if matches!(rule, FilterRule::Range { .. })
                    && dataset.numeric_bounds(column).is_none()
                {
                    "no numeric bounds".to_string()
                } else {
                    "ok".to_string()
                };
                rows.push(vec!["filter".to_string(), filter.id.clone(), status]);
            }
        }
    }

    for display in &board.display {
        let status = if dataset.column_index(&display.column).is_some() {
            "ok".to_string()
        } else {
            format!("column '{}' missing", display.column)
        };
        rows.push(vec![
            "display".to_string(),
            display.label.clone(),
            status,
        ]);
    }

    if let Some(sort) = &board.sort {
        let status = if dataset.column_index(&sort.column).is_some() {
            "ok".to_string()
        } else {
            format!("column '{}' missing", sort.column)
        };
        rows.push(vec!["sort".to_string(), sort.column.clone(), status]);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn diagnose_flags_missing_columns_and_bounds() {
        let board = Board::from_yaml_str(
            r#"
columns:
  - name: Price
    kind: numeric
filters:
  - id: price
    kind: range
    column: Price
  - id: ghost
    kind: set
    column: Ghost
display:
  - column: Name
    label: Product
sort:
  column: Score
"#,
        )
        .expect("board");
        let dataset = Dataset::from_rows(
            vec!["Name".to_string(), "Price".to_string()],
            vec![vec!["A".to_string(), "n/a".to_string()]],
            &board,
        );

        let rows = diagnose(&board, &dataset);
        assert_eq!(
            rows,
            vec![
                vec![
                    "filter".to_string(),
                    "price".to_string(),
                    "no numeric bounds".to_string()
                ],
                vec![
                    "filter".to_string(),
                    "ghost".to_string(),
                    "column 'Ghost' missing".to_string()
                ],
                vec![
                    "display".to_string(),
                    "Product".to_string(),
                    "ok".to_string()
                ],
                vec![
                    "sort".to_string(),
                    "Score".to_string(),
                    "column 'Score' missing".to_string()
                ],
            ]
        );
    }
}
