//! Immutable in-memory dataset.
//!
//! A [`Dataset`] is loaded once per session and never mutated: filtering
//! produces row masks over it, not copies of it. Canonicalization (trim,
//! case-fold, NA replacement) happens here, at load, so every mask
//! evaluation afterwards sees identical values. Two artifacts are computed
//! alongside the rows because filters need them before any selection
//! arrives: the distinct values of each categorical/boolean column (set
//! filter domains) and the min/max of each numeric column (range filter
//! bounds).

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use itertools::Itertools;
use log::debug;

use crate::{
    board::{Board, ColumnKind},
    data::{Value, parse_typed_value},
    io_utils,
};

#[derive(Debug, Clone)]
pub struct Dataset {
    headers: Vec<String>,
    kinds: Vec<ColumnKind>,
    rows: Vec<Vec<Option<Value>>>,
    distinct: HashMap<String, Vec<String>>,
    bounds: HashMap<String, (f64, f64)>,
}

impl Dataset {
    /// The explicit no-data state: zero columns, zero rows.
    pub fn empty() -> Self {
        Dataset {
            headers: Vec::new(),
            kinds: Vec::new(),
            rows: Vec::new(),
            distinct: HashMap::new(),
            bounds: HashMap::new(),
        }
    }

    pub fn from_csv(
        path: &Path,
        board: &Board,
        delimiter: u8,
        encoding: &'static Encoding,
    ) -> Result<Self> {
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter, true)?;
        let headers = io_utils::reader_headers(&mut reader, encoding)?;
        // A zero-byte file yields an empty header record; that is the
        // no-data state, not a failure.
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Ok(Dataset::empty());
        }

        let mut raw_rows = Vec::new();
        for (ordinal, result) in reader.byte_records().enumerate() {
            let record = result.with_context(|| format!("Reading row {}", ordinal + 2))?;
            raw_rows.push(io_utils::decode_record(&record, encoding)?);
        }
        debug!(
            "Loaded {} row(s) x {} column(s) from {:?}",
            raw_rows.len(),
            headers.len(),
            path
        );
        Ok(Dataset::from_rows(headers, raw_rows, board))
    }

    /// Build a dataset from already-decoded rows. Canonicalizes and types
    /// each cell per the board's column descriptors, then snapshots the
    /// distinct-value and numeric-bound artifacts.
    pub fn from_rows(headers: Vec<String>, raw_rows: Vec<Vec<String>>, board: &Board) -> Self {
        let kinds: Vec<ColumnKind> = headers
            .iter()
            .map(|name| board.column_kind(name))
            .collect();

        let rows: Vec<Vec<Option<Value>>> = raw_rows
            .into_iter()
            .map(|raw| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(idx, name)| {
                        let cell = raw.get(idx).map(String::as_str).unwrap_or("");
                        let canonical = match board
                            .column_spec(name)
                            .and_then(|spec| spec.canonicalize.as_ref())
                        {
                            Some(rule) => rule.apply(cell),
                            None => std::borrow::Cow::Borrowed(cell),
                        };
                        parse_typed_value(canonical.as_ref(), kinds[idx])
                    })
                    .collect()
            })
            .collect();

        let mut distinct = HashMap::new();
        let mut bounds = HashMap::new();
        for (idx, name) in headers.iter().enumerate() {
            match kinds[idx] {
                ColumnKind::Categorical | ColumnKind::Boolean => {
                    let values: Vec<String> = rows
                        .iter()
                        .filter_map(|row| row[idx].as_ref())
                        .map(Value::as_display)
                        .sorted()
                        .dedup()
                        .collect();
                    distinct.insert(name.clone(), values);
                }
                ColumnKind::Numeric => {
                    let numerics = rows
                        .iter()
                        .filter_map(|row| row[idx].as_ref())
                        .filter_map(Value::as_f64);
                    if let Some((lo, hi)) = fold_bounds(numerics) {
                        bounds.insert(name.clone(), (lo, hi));
                    }
                }
                ColumnKind::Link | ColumnKind::Text => {}
            }
        }

        Dataset {
            headers,
            kinds,
            rows,
            distinct,
            bounds,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn column_kind(&self, index: usize) -> Option<ColumnKind> {
        self.kinds.get(index).copied()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|cells| cells[column].as_ref())
    }

    pub fn display_value(&self, row: usize, column: usize) -> String {
        self.cell(row, column)
            .map(Value::as_display)
            .unwrap_or_default()
    }

    /// Distinct canonical values of a categorical/boolean column, sorted.
    pub fn distinct_values(&self, column: &str) -> Option<&[String]> {
        self.distinct.get(column).map(Vec::as_slice)
    }

    /// Load-time min/max of a numeric column. Absent when the column held
    /// no parseable numeric, which leaves range filters over it inert.
    pub fn numeric_bounds(&self, column: &str) -> Option<(f64, f64)> {
        self.bounds.get(column).copied()
    }
}

fn fold_bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, value| match acc {
        None => Some((value, value)),
        Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
    })
}
