//! Predicate Compiler: many heterogeneous filter selections in, one row
//! mask out.
//!
//! Every *active* filter contributes a row predicate; the mask is their
//! conjunction over the full, unsorted dataset. An untouched widget must
//! cost nothing and restrict nothing, so each filter kind first decides
//! whether the current selection restricts anything at all, and only then
//! compiles to a [`CompiledFilter`] with resolved column indices.

use std::collections::HashSet;

use log::debug;

use crate::{
    board::{Board, EmptyPolicy, FilterRule, FilterSpec, PairState},
    dataset::Dataset,
    selection::{Selection, Selections},
    warnings::Warning,
};

/// Boolean mask aligned to dataset rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMask(Vec<bool>);

impl RowMask {
    pub fn all_true(len: usize) -> Self {
        RowMask(vec![true; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_set(&self, row: usize) -> bool {
        self.0.get(row).copied().unwrap_or(false)
    }

    /// Number of rows the mask keeps.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|bit| **bit).count()
    }

    /// Indices of kept rows, in original dataset order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(row, bit)| bit.then_some(row))
    }

    fn restrict(&mut self, dataset: &Dataset, filter: &CompiledFilter) {
        for (row, bit) in self.0.iter_mut().enumerate() {
            if *bit && !filter.matches(dataset, row) {
                *bit = false;
            }
        }
    }
}

#[derive(Debug)]
pub struct MaskOutcome {
    pub mask: RowMask,
    pub warnings: Vec<Warning>,
}

/// Compile the current selections into a single row mask.
///
/// Inactive filters contribute nothing; filters over columns the dataset
/// does not have degrade to inactive with a warning. No selection state is
/// read from anywhere but the `selections` argument.
pub fn compile_mask(dataset: &Dataset, board: &Board, selections: &Selections) -> MaskOutcome {
    let mut mask = RowMask::all_true(dataset.row_count());
    let mut warnings = Vec::new();

    for (id, _) in selections.iter() {
        if board.filter(id).is_none() {
            warnings.push(Warning::UnknownSelection { id: id.to_string() });
        }
    }

    let mut active = 0usize;
    for filter in &board.filters {
        let selection = selections.get(&filter.id);
        if let Some(compiled) = compile_filter(dataset, filter, selection, &mut warnings) {
            mask.restrict(dataset, &compiled);
            active += 1;
        }
    }
    debug!(
        "Compiled {active} active filter(s) over {} row(s): {} kept",
        mask.len(),
        mask.count()
    );

    MaskOutcome { mask, warnings }
}

/// A filter reduced to resolved column indices and owned match data.
#[derive(Debug)]
enum CompiledFilter {
    /// Row's canonical display value must be in the allowed set.
    InSet {
        column: usize,
        allowed: HashSet<String>,
    },
    /// Row's canonical display value must equal one configured value.
    Equals { column: usize, value: String },
    /// Row's numeric value must fall inside the inclusive interval;
    /// missing/unparseable numerics are excluded.
    InRange { column: usize, lo: f64, hi: f64 },
    /// Row must be truthy in every column (conjunctive feature list).
    AllTruthy { columns: Vec<usize> },
    /// Explicitly empty selection under the hide-all policy.
    Nothing,
}

impl CompiledFilter {
    fn matches(&self, dataset: &Dataset, row: usize) -> bool {
        match self {
            CompiledFilter::InSet { column, allowed } => {
                allowed.contains(&dataset.display_value(row, *column))
            }
            CompiledFilter::Equals { column, value } => {
                dataset.display_value(row, *column) == *value
            }
            CompiledFilter::InRange { column, lo, hi } => dataset
                .cell(row, *column)
                .and_then(|value| value.as_f64())
                .is_some_and(|value| *lo <= value && value <= *hi),
            CompiledFilter::AllTruthy { columns } => columns.iter().all(|column| {
                dataset
                    .cell(row, *column)
                    .is_some_and(|value| value.is_truthy())
            }),
            CompiledFilter::Nothing => false,
        }
    }
}

/// Activation + compilation for one filter. `None` means inactive: either
/// the selection imposes no restriction, or the board references data this
/// dataset does not have (warned).
fn compile_filter(
    dataset: &Dataset,
    filter: &FilterSpec,
    selection: Option<&Selection>,
    warnings: &mut Vec<Warning>,
) -> Option<CompiledFilter> {
    match &filter.rule {
        FilterRule::Set { column, on_empty } => {
            let values = match selection {
                None => return None,
                Some(Selection::Values(values)) => values,
                Some(_) => return warn_shape(filter, warnings),
            };
            let column_index = resolve_column(dataset, filter, column, warnings)?;
            if values.is_empty() {
                return match on_empty {
                    EmptyPolicy::Nothing => Some(CompiledFilter::Nothing),
                    EmptyPolicy::Everything => None,
                };
            }
            // Selecting every distinct value is no restriction at all.
            if let Some(distinct) = dataset.distinct_values(column)
                && covers_all(values, distinct)
            {
                return None;
            }
            Some(CompiledFilter::InSet {
                column: column_index,
                allowed: values.iter().cloned().collect(),
            })
        }
        FilterRule::BoolPair { column, states } => {
            let labels = match selection {
                None => return None,
                Some(Selection::Values(labels)) => labels,
                Some(_) => return warn_shape(filter, warnings),
            };
            if labels.is_empty() {
                return None;
            }
            let column_index = resolve_column(dataset, filter, column, warnings)?;
            let allowed = checked_state_values(filter, states, labels, warnings);
            if allowed.is_empty() {
                return None;
            }
            Some(CompiledFilter::InSet {
                column: column_index,
                allowed,
            })
        }
        FilterRule::Flag { column, true_value } => {
            let checked = match selection {
                None => false,
                Some(Selection::Checked(checked)) => *checked,
                // Symmetric CLI form: --select id=<true_value>.
                Some(Selection::Values(values)) => values.iter().any(|v| v == true_value),
                Some(_) => return warn_shape(filter, warnings),
            };
            if !checked {
                return None;
            }
            let column_index = resolve_column(dataset, filter, column, warnings)?;
            Some(CompiledFilter::Equals {
                column: column_index,
                value: true_value.clone(),
            })
        }
        FilterRule::Range { column } => {
            let (lo, hi) = match selection {
                None => return None,
                Some(Selection::Range(lo, hi)) => (*lo, *hi),
                Some(_) => return warn_shape(filter, warnings),
            };
            let column_index = resolve_column(dataset, filter, column, warnings)?;
            let Some((min, max)) = dataset.numeric_bounds(column) else {
                // Entirely non-numeric column: the slider never existed.
                warnings.push(Warning::RangeUnavailable {
                    filter: filter.id.clone(),
                    column: column.clone(),
                });
                return None;
            };
            // Only a strict narrowing of the data range restricts rows.
            if lo <= min && hi >= max {
                return None;
            }
            Some(CompiledFilter::InRange {
                column: column_index,
                lo,
                hi,
            })
        }
        FilterRule::Features { labels } => {
            let selected = match selection {
                None => return None,
                Some(Selection::Values(selected)) => selected,
                Some(_) => return warn_shape(filter, warnings),
            };
            if selected.is_empty() {
                return None;
            }
            let mut columns = Vec::new();
            for wanted in selected {
                let Some(feature) = labels.iter().find(|label| &label.label == wanted) else {
                    warnings.push(Warning::UnknownLabel {
                        filter: filter.id.clone(),
                        label: wanted.clone(),
                    });
                    continue;
                };
                match dataset.column_index(&feature.column) {
                    Some(index) => columns.push(index),
                    None => warnings.push(Warning::FeatureColumnMissing {
                        filter: filter.id.clone(),
                        label: feature.label.clone(),
                        column: feature.column.clone(),
                    }),
                }
            }
            if columns.is_empty() {
                return None;
            }
            Some(CompiledFilter::AllTruthy { columns })
        }
    }
}

fn resolve_column(
    dataset: &Dataset,
    filter: &FilterSpec,
    column: &str,
    warnings: &mut Vec<Warning>,
) -> Option<usize> {
    match dataset.column_index(column) {
        Some(index) => Some(index),
        None => {
            warnings.push(Warning::FilterColumnMissing {
                filter: filter.id.clone(),
                column: column.to_string(),
            });
            None
        }
    }
}

fn warn_shape(filter: &FilterSpec, warnings: &mut Vec<Warning>) -> Option<CompiledFilter> {
    warnings.push(Warning::SelectionShape {
        filter: filter.id.clone(),
    });
    None
}

fn covers_all(selected: &[String], distinct: &[String]) -> bool {
    distinct
        .iter()
        .all(|value| selected.iter().any(|candidate| candidate == value))
}

/// Allowed stored values for the checked boolean-pair states. Labels the
/// pair does not declare are warned about and skipped.
fn checked_state_values(
    filter: &FilterSpec,
    states: &[PairState],
    labels: &[String],
    warnings: &mut Vec<Warning>,
) -> HashSet<String> {
    let mut allowed = HashSet::new();
    for label in labels {
        match states.iter().find(|state| &state.label == label) {
            Some(state) => {
                allowed.insert(state.value.clone());
            }
            None => warnings.push(Warning::UnknownLabel {
                filter: filter.id.clone(),
                label: label.clone(),
            }),
        }
    }
    allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::dataset::Dataset;

    fn board() -> Board {
        Board::from_yaml_str(
            r#"
columns:
  - name: Material
    kind: categorical
  - name: Rating
    kind: numeric
filters:
  - id: material
    kind: set
    column: Material
    on_empty: nothing
  - id: rating
    kind: range
    column: Rating
"#,
        )
        .expect("board")
    }

    fn dataset(board: &Board) -> Dataset {
        Dataset::from_rows(
            vec!["Material".to_string(), "Rating".to_string()],
            vec![
                vec!["Clay".to_string(), "4.5".to_string()],
                vec!["Corn".to_string(), "3.0".to_string()],
                vec!["Clay".to_string(), "2.0".to_string()],
            ],
            board,
        )
    }

    #[test]
    fn no_selections_mean_all_rows_and_no_warnings() {
        let board = board();
        let dataset = dataset(&board);
        let outcome = compile_mask(&dataset, &board, &Selections::new());
        assert_eq!(outcome.mask.count(), 3);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn empty_selection_under_nothing_policy_hides_all_rows() {
        let board = board();
        let dataset = dataset(&board);
        let mut selections = Selections::new();
        selections.insert("material", Selection::Values(Vec::new()));

        let outcome = compile_mask(&dataset, &board, &selections);
        assert_eq!(outcome.mask.count(), 0);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn empty_selection_under_everything_policy_is_inactive() {
        let board = Board::from_yaml_str(
            "filters:\n  - id: material\n    kind: set\n    column: Material\n    on_empty: everything\n",
        )
        .expect("board");
        let dataset = dataset(&self::board());
        let mut selections = Selections::new();
        selections.insert("material", Selection::Values(Vec::new()));

        let outcome = compile_mask(&dataset, &board, &selections);
        assert_eq!(outcome.mask.count(), 3);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn full_distinct_selection_is_a_no_op() {
        let board = board();
        let dataset = dataset(&board);
        let mut selections = Selections::new();
        selections.insert(
            "material",
            Selection::Values(vec!["Clay".to_string(), "Corn".to_string()]),
        );

        let outcome = compile_mask(&dataset, &board, &selections);
        assert_eq!(outcome.mask.count(), 3);
    }

    #[test]
    fn range_matching_data_bounds_is_a_no_op() {
        let board = board();
        let dataset = dataset(&board);
        let mut selections = Selections::new();
        selections.insert("rating", Selection::Range(2.0, 4.5));

        let outcome = compile_mask(&dataset, &board, &selections);
        assert_eq!(outcome.mask.count(), 3);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn narrowed_range_excludes_rows_outside_and_missing() {
        let board = board();
        let dataset = dataset(&board);
        let mut selections = Selections::new();
        selections.insert("rating", Selection::Range(3.0, 4.5));

        let outcome = compile_mask(&dataset, &board, &selections);
        assert_eq!(outcome.mask.count(), 2);
        let kept: Vec<usize> = outcome.mask.indices().collect();
        assert_eq!(kept, vec![0, 1]);
    }

    #[test]
    fn missing_filter_column_warns_only_when_selected() {
        let board = Board::from_yaml_str(
            r#"
filters:
  - id: ghost
    kind: set
    column: NotThere
"#,
        )
        .expect("board");
        let dataset = dataset(&self::board());

        let silent = compile_mask(&dataset, &board, &Selections::new());
        assert!(silent.warnings.is_empty());

        let mut selections = Selections::new();
        selections.insert("ghost", Selection::Values(vec!["x".to_string()]));
        let outcome = compile_mask(&dataset, &board, &selections);
        assert_eq!(outcome.mask.count(), 3, "missing column filter is inert");
        assert_eq!(
            outcome.warnings,
            vec![Warning::FilterColumnMissing {
                filter: "ghost".to_string(),
                column: "NotThere".to_string(),
            }]
        );
    }

    #[test]
    fn unknown_selection_id_warns() {
        let board = board();
        let dataset = dataset(&board);
        let mut selections = Selections::new();
        selections.insert("nope", Selection::Checked(true));

        let outcome = compile_mask(&dataset, &board, &selections);
        assert_eq!(outcome.mask.count(), 3);
        assert_eq!(
            outcome.warnings,
            vec![Warning::UnknownSelection {
                id: "nope".to_string()
            }]
        );
    }
}
