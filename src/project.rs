//! Projection & Formatter: from a row mask to the display-ready table.
//!
//! Column presence is checked once, up front, against the dataset; the rest
//! of the pipeline (sort, rename, format) then works off resolved indices.
//! The match count is taken straight from the mask, before sorting, limits,
//! or column selection, so it is the same number no matter what the board
//! chooses to display.

use crate::{
    board::{Board, DisplayFormat, SortSpec},
    data::{ComparableValue, Value, format_currency, parse_currency_literal},
    dataset::Dataset,
    mask::RowMask,
    warnings::Warning,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    pub text: String,
    pub href: Option<String>,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Cell {
            text: text.into(),
            href: None,
        }
    }

    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Cell {
            text: text.into(),
            href: Some(href.into()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DisplayTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl DisplayTable {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug)]
pub struct Projection {
    pub table: DisplayTable,
    /// Rows the mask kept, independent of sorting, limits, or which
    /// columns are displayed.
    pub match_count: usize,
    pub warnings: Vec<Warning>,
}

struct DisplayField {
    index: usize,
    label: String,
    format: DisplayFormat,
}

pub fn project(
    dataset: &Dataset,
    mask: &RowMask,
    board: &Board,
    sort_override: Option<&SortSpec>,
    limit: Option<usize>,
) -> Projection {
    let mut warnings = Vec::new();
    let match_count = mask.count();

    // Schema intersection happens once, here, instead of per-cell checks
    // scattered through the formatting below.
    let mut fields = Vec::new();
    for display in &board.display {
        match dataset.column_index(&display.column) {
            Some(index) => fields.push(DisplayField {
                index,
                label: display.label.clone(),
                format: display.format.clone(),
            }),
            None => warnings.push(Warning::DisplayColumnMissing {
                column: display.column.clone(),
            }),
        }
    }
    if fields.is_empty() && !board.display.is_empty() {
        warnings.push(Warning::NoDisplayColumns);
    }

    let mut ordered: Vec<usize> = mask.indices().collect();
    let sort = sort_override.or(board.sort.as_ref());
    if let Some(spec) = sort {
        match dataset.column_index(&spec.column) {
            Some(column) => sort_rows(&mut ordered, dataset, column, spec.descending),
            None => warnings.push(Warning::SortColumnMissing {
                column: spec.column.clone(),
            }),
        }
    }
    if let Some(limit) = limit {
        ordered.truncate(limit);
    }

    let rows = ordered
        .iter()
        .map(|&row| {
            fields
                .iter()
                .map(|field| format_cell(dataset, row, field))
                .collect()
        })
        .collect();

    Projection {
        table: DisplayTable {
            headers: fields.iter().map(|field| field.label.clone()).collect(),
            rows,
        },
        match_count,
        warnings,
    }
}

/// `Vec::sort_by` is stable, so equal keys keep their original dataset
/// order without an explicit ordinal tiebreak.
fn sort_rows(ordered: &mut [usize], dataset: &Dataset, column: usize, descending: bool) {
    ordered.sort_by(|&a, &b| {
        let left = ComparableValue(dataset.cell(a, column).cloned());
        let right = ComparableValue(dataset.cell(b, column).cloned());
        let ord = left.cmp(&right);
        if descending { ord.reverse() } else { ord }
    });
}

fn format_cell(dataset: &Dataset, row: usize, field: &DisplayField) -> Cell {
    match &field.format {
        DisplayFormat::Text => Cell::text(dataset.display_value(row, field.index)),
        DisplayFormat::Link { link_label } => {
            let url = dataset.display_value(row, field.index);
            if url.is_empty() {
                Cell::default()
            } else {
                Cell::link(link_label.clone(), url)
            }
        }
        DisplayFormat::Percent => {
            let fraction = numeric_cell(dataset, row, field.index).unwrap_or(0.0);
            Cell::text(format!("{}%", (fraction * 100.0).round() as i64))
        }
        DisplayFormat::Decimal { places } => match numeric_cell(dataset, row, field.index) {
            Some(value) => Cell::text(format!("{value:.places$}", places = *places)),
            None => Cell::default(),
        },
        DisplayFormat::Currency { symbol } => match numeric_cell(dataset, row, field.index) {
            Some(value) => Cell::text(format_currency(symbol, value)),
            None => Cell::default(),
        },
    }
}

fn numeric_cell(dataset: &Dataset, row: usize, column: usize) -> Option<f64> {
    match dataset.cell(row, column)? {
        Value::String(raw) => parse_currency_literal(raw),
        value => value.as_f64(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::mask::compile_mask;
    use crate::selection::Selections;

    fn board() -> Board {
        Board::from_yaml_str(
            r#"
columns:
  - name: Product_URL
    kind: link
  - name: Score
    kind: numeric
  - name: Price
    kind: numeric
display:
  - column: Name
    label: Product
  - column: Product_URL
    label: Link
    format:
      kind: link
      link_label: View Product
  - column: Score
    label: Score
    format:
      kind: percent
  - column: Price
    label: Price
    format:
      kind: currency
sort:
  column: Score
"#,
        )
        .expect("board")
    }

    fn dataset(board: &Board) -> Dataset {
        Dataset::from_rows(
            vec![
                "Name".to_string(),
                "Product_URL".to_string(),
                "Score".to_string(),
                "Price".to_string(),
            ],
            vec![
                vec![
                    "Scoop Away".to_string(),
                    "https://example.com/a".to_string(),
                    "0.87".to_string(),
                    "12.5".to_string(),
                ],
                vec![
                    "Fresh Step".to_string(),
                    String::new(),
                    "0.91".to_string(),
                    String::new(),
                ],
                vec![
                    "Arm & Hammer".to_string(),
                    "https://example.com/c".to_string(),
                    "0.87".to_string(),
                    "9".to_string(),
                ],
            ],
            board,
        )
    }

    fn full_mask(dataset: &Dataset, board: &Board) -> RowMask {
        compile_mask(dataset, board, &Selections::new()).mask
    }

    #[test]
    fn projection_sorts_descending_and_formats_cells() {
        let board = board();
        let dataset = dataset(&board);
        let mask = full_mask(&dataset, &board);

        let projection = project(&dataset, &mask, &board, None, None);
        assert_eq!(projection.match_count, 3);
        assert_eq!(
            projection.table.headers,
            vec!["Product", "Link", "Score", "Price"]
        );

        let names: Vec<&str> = projection
            .table
            .rows
            .iter()
            .map(|row| row[0].text.as_str())
            .collect();
        // 0.91 first; the two 0.87 rows keep their original relative order.
        assert_eq!(names, vec!["Fresh Step", "Scoop Away", "Arm & Hammer"]);

        let fresh_step = &projection.table.rows[0];
        assert_eq!(fresh_step[1], Cell::default(), "no URL, no link");
        assert_eq!(fresh_step[2].text, "91%");
        assert_eq!(fresh_step[3], Cell::default(), "missing price stays blank");

        let scoop = &projection.table.rows[1];
        assert_eq!(
            scoop[1],
            Cell::link("View Product", "https://example.com/a")
        );
        assert_eq!(scoop[3].text, "$12.50");
    }

    #[test]
    fn missing_display_column_is_dropped_without_touching_count() {
        let board = Board::from_yaml_str(
            r#"
display:
  - column: Name
    label: Product
  - column: Ghost
    label: Missing
"#,
        )
        .expect("board");
        let dataset = dataset(&self::board());
        let mask = full_mask(&dataset, &self::board());

        let projection = project(&dataset, &mask, &board, None, None);
        assert_eq!(projection.table.headers, vec!["Product"]);
        assert_eq!(projection.match_count, 3);
        assert_eq!(
            projection.warnings,
            vec![Warning::DisplayColumnMissing {
                column: "Ghost".to_string()
            }]
        );
    }

    #[test]
    fn empty_display_mapping_preserves_match_count() {
        let board = Board::from_yaml_str("display: []").expect("board");
        let dataset = dataset(&self::board());
        let mask = full_mask(&dataset, &self::board());

        let projection = project(&dataset, &mask, &board, None, None);
        assert_eq!(projection.table.column_count(), 0);
        assert_eq!(projection.match_count, 3);
    }

    #[test]
    fn no_surviving_display_columns_yields_status_not_error() {
        let board = Board::from_yaml_str(
            "display:\n  - column: Ghost\n    label: Missing\n",
        )
        .expect("board");
        let dataset = dataset(&self::board());
        let mask = full_mask(&dataset, &self::board());

        let projection = project(&dataset, &mask, &board, None, None);
        assert_eq!(projection.table.column_count(), 0);
        assert!(projection.warnings.contains(&Warning::NoDisplayColumns));
    }

    #[test]
    fn limit_truncates_rows_but_not_match_count() {
        let board = board();
        let dataset = dataset(&board);
        let mask = full_mask(&dataset, &board);

        let projection = project(&dataset, &mask, &board, None, Some(1));
        assert_eq!(projection.table.row_count(), 1);
        assert_eq!(projection.match_count, 3);
    }
}
