//! The `facets` command: what the sidebar widgets would be fed.
//!
//! For every filter on the board this lists the data behind its widget:
//! distinct values with counts and shares for set / boolean-pair / flag
//! filters, the load-time bounds for range filters, and per-label truthy
//! tallies for feature lists. Filters over columns the dataset lacks are
//! skipped, matching how the mask compiler treats them.

use std::collections::HashMap;

use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;

use crate::{
    board::{Board, FilterRule},
    cli::FacetsArgs,
    dataset::Dataset,
    io_utils, table,
};

pub fn execute(args: &FacetsArgs) -> Result<()> {
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

    let headers = ["filter", "column", "value", "count", "share"]
        .map(String::from)
        .to_vec();
    let rows = facet_rows(&dataset, &board, args.top);
    table::print_table(&headers, &rows);
    info!(
        "Summarized {} filter(s) over {} row(s)",
        board.filters.len(),
        dataset.row_count()
    );
    Ok(())
}

pub fn facet_rows(dataset: &Dataset, board: &Board, top: usize) -> Vec<Vec<String>> {
    let total = dataset.row_count();
    let mut rows = Vec::new();

    for filter in &board.filters {
        match &filter.rule {
            FilterRule::Set { column, .. }
            | FilterRule::BoolPair { column, .. }
            | FilterRule::Flag { column, .. } => {
                let Some(index) = dataset.column_index(column) else {
                    continue;
                };
                let mut counts = value_counts(dataset, index);
                if top > 0 && counts.len() > top {
                    counts.truncate(top);
                }
                for (value, count) in counts {
                    rows.push(facet_row(&filter.id, column, &value, count, total));
                }
            }
            FilterRule::Range { column } => {
                let Some(index) = dataset.column_index(column) else {
                    continue;
                };
                let Some((lo, hi)) = dataset.numeric_bounds(column) else {
                    continue;
                };
                let numeric = (0..total)
                    .filter(|&row| {
                        dataset
                            .cell(row, index)
                            .and_then(|value| value.as_f64())
                            .is_some()
                    })
                    .count();
                rows.push(facet_row(
                    &filter.id,
                    column,
                    &format!("{lo}..{hi}"),
                    numeric,
                    total,
                ));
            }
            FilterRule::Features { labels } => {
                for label in labels {
                    let Some(index) = dataset.column_index(&label.column) else {
                        continue;
                    };
                    let truthy = (0..total)
                        .filter(|&row| {
                            dataset
                                .cell(row, index)
                                .is_some_and(|value| value.is_truthy())
                        })
                        .count();
                    rows.push(facet_row(&filter.id, &label.column, &label.label, truthy, total));
                }
            }
        }
    }
    rows
}

fn facet_row(id: &str, column: &str, value: &str, count: usize, total: usize) -> Vec<String> {
    let share = if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    };
    vec![
        id.to_string(),
        column.to_string(),
        value.to_string(),
        count.to_string(),
        format!("{share:.2}%"),
    ]
}

/// Distinct display values with occurrence counts, most frequent first,
/// value order breaking ties.
fn value_counts(dataset: &Dataset, column: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in 0..dataset.row_count() {
        if let Some(value) = dataset.cell(row, column) {
            *counts.entry(value.as_display()).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn board() -> Board {
        Board::from_yaml_str(
            r#"
columns:
  - name: Material
    kind: categorical
  - name: Rating
    kind: numeric
  - name: Clumping
    kind: boolean
filters:
  - id: material
    kind: set
    column: Material
  - id: rating
    kind: range
    column: Rating
  - id: features
    kind: features
    labels:
      - label: Good Clumping
        column: Clumping
"#,
        )
        .expect("board")
    }

    fn dataset(board: &Board) -> Dataset {
        Dataset::from_rows(
            vec![
                "Material".to_string(),
                "Rating".to_string(),
                "Clumping".to_string(),
            ],
            vec![
                vec!["Clay".to_string(), "4.5".to_string(), "1".to_string()],
                vec!["Clay".to_string(), "3.5".to_string(), "0".to_string()],
                vec!["Corn".to_string(), "2.5".to_string(), "1".to_string()],
                vec!["Pine".to_string(), String::new(), "1".to_string()],
            ],
            board,
        )
    }

    #[test]
    fn set_facets_count_distinct_values_most_frequent_first() {
        let board = board();
        let dataset = dataset(&board);
        let rows = facet_rows(&dataset, &board, 0);

        let material: Vec<&Vec<String>> =
            rows.iter().filter(|row| row[0] == "material").collect();
        assert_eq!(material.len(), 3);
        assert_eq!(material[0][2], "Clay");
        assert_eq!(material[0][3], "2");
        assert_eq!(material[0][4], "50.00%");
    }

    #[test]
    fn range_facets_report_bounds_and_numeric_count() {
        let board = board();
        let dataset = dataset(&board);
        let rows = facet_rows(&dataset, &board, 0);

        let rating: Vec<&Vec<String>> = rows.iter().filter(|row| row[0] == "rating").collect();
        assert_eq!(rating.len(), 1);
        assert_eq!(rating[0][2], "2.5..4.5");
        assert_eq!(rating[0][3], "3", "missing rating excluded from count");
    }

    #[test]
    fn feature_facets_tally_truthy_rows_per_label() {
        let board = board();
        let dataset = dataset(&board);
        let rows = facet_rows(&dataset, &board, 0);

        let features: Vec<&Vec<String>> =
            rows.iter().filter(|row| row[0] == "features").collect();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0][2], "Good Clumping");
        assert_eq!(features[0][3], "3");
    }

    #[test]
    fn top_limits_distinct_values_per_filter() {
        let board = board();
        let dataset = dataset(&board);
        let rows = facet_rows(&dataset, &board, 1);

        let material: Vec<&Vec<String>> =
            rows.iter().filter(|row| row[0] == "material").collect();
        assert_eq!(material.len(), 1);
    }
}
