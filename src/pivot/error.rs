use std::{
    error::Error,
    fmt::{Display, Formatter},
};

use serde_json::Value;

use crate::server::api::aggregate_request::AggregationFunction;

use super::AGGREGATION_FUNCTION;

#[derive(Debug, Clone, PartialEq)]
pub enum PivotError {
    EmptyKeyPath,
    MissingColumnName(Vec<String>),
    SeparatorInSegment { segment: String, path: Vec<String> },
    ConflictingColumnPath(Vec<String>),
    GroupDepthExceeded { group_keys: usize, row_group_cols: usize },
    NoGroupFields,
    InvalidWindow { start_row: u64, end_row: u64 },
    UnsupportedAggregation { field: String, agg_func: AggregationFunction },
    RowCountMismatch { data_rows: usize, index_rows: usize },
    RowWidthMismatch { row: usize, expected: usize, actual: usize },
    InvalidSegment { column: usize, value: Value },
    InvalidCell { row: usize, column: usize, value: Value },
    InvalidIndexValue { row: usize, value: Value },
    IndexArityMismatch { row: usize, expected: usize, actual: usize },
}

impl PivotError {
    /// Shape errors come from a malformed aggregation response rather than from
    /// the request or the configured layout.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            PivotError::RowCountMismatch { .. }
                | PivotError::RowWidthMismatch { .. }
                | PivotError::InvalidSegment { .. }
                | PivotError::InvalidCell { .. }
                | PivotError::InvalidIndexValue { .. }
                | PivotError::IndexArityMismatch { .. }
        )
    }
}

impl Display for PivotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PivotError::EmptyKeyPath => write!(f, "Pivot column key path must not be empty"),
            PivotError::MissingColumnName(path) => {
                write!(f, "Pivot column key path has no column name: {:?}", path)
            }
            PivotError::SeparatorInSegment { segment, path } => write!(
                f,
                "Pivot column segment \"{}\" in {:?} contains the reserved separator",
                segment, path
            ),
            PivotError::ConflictingColumnPath(path) => write!(
                f,
                "Pivot column path {:?} uses a segment as both a column and a column group",
                path
            ),
            PivotError::GroupDepthExceeded {
                group_keys,
                row_group_cols,
            } => write!(
                f,
                "Requested {} group keys but only {} row group columns are active",
                group_keys, row_group_cols
            ),
            PivotError::NoGroupFields => {
                write!(f, "No row group fields are configured or requested")
            }
            PivotError::InvalidWindow { start_row, end_row } => write!(
                f,
                "Row window ends at {} before it starts at {}",
                end_row, start_row
            ),
            PivotError::UnsupportedAggregation { field, agg_func } => write!(
                f,
                "Column {} requests {} but the aggregation service is always asked for {}",
                field, agg_func, AGGREGATION_FUNCTION
            ),
            PivotError::RowCountMismatch {
                data_rows,
                index_rows,
            } => write!(
                f,
                "Aggregate response has {} data rows but {} index values",
                data_rows, index_rows
            ),
            PivotError::RowWidthMismatch {
                row,
                expected,
                actual,
            } => write!(
                f,
                "Aggregate response row {} has {} values, expected {}",
                row, actual, expected
            ),
            PivotError::InvalidSegment { column, value } => write!(
                f,
                "Aggregate response column {} has a non scalar key segment: {}",
                column, value
            ),
            PivotError::InvalidCell { row, column, value } => write!(
                f,
                "Aggregate response cell ({}, {}) is not a number: {}",
                row, column, value
            ),
            PivotError::InvalidIndexValue { row, value } => {
                write!(f, "Aggregate response index {} is not a scalar: {}", row, value)
            }
            PivotError::IndexArityMismatch {
                row,
                expected,
                actual,
            } => write!(
                f,
                "Aggregate response index {} has {} levels, expected {}",
                row, actual, expected
            ),
        }
    }
}
impl Error for PivotError {}
