//! Non-fatal conditions surfaced to the caller next to every result.
//!
//! Nothing here is an error: a board that names columns the dataset lost is
//! degraded (filters inert, display columns omitted), never rejected.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("filter '{filter}' references missing column '{column}' and is inactive")]
    FilterColumnMissing { filter: String, column: String },
    #[error("filter '{filter}' feature '{label}' references missing column '{column}'")]
    FeatureColumnMissing {
        filter: String,
        label: String,
        column: String,
    },
    #[error("filter '{filter}' has no numeric bounds for column '{column}'; range ignored")]
    RangeUnavailable { filter: String, column: String },
    #[error("selection '{id}' does not match any filter on this board")]
    UnknownSelection { id: String },
    #[error("filter '{filter}' has no state or feature labelled '{label}'")]
    UnknownLabel { filter: String, label: String },
    #[error("selection for filter '{filter}' has the wrong shape and was ignored")]
    SelectionShape { filter: String },
    #[error("display column '{column}' is missing from the dataset and was omitted")]
    DisplayColumnMissing { column: String },
    #[error("none of the display columns exist in the dataset")]
    NoDisplayColumns,
    #[error("sort column '{column}' is missing from the dataset; original order kept")]
    SortColumnMissing { column: String },
}
