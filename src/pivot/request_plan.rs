use serde_json::Value;

use crate::server::{
    api::aggregate_request::{AggregateRequest, AggregationFunction},
    config::Config,
};

use super::PivotError;

/// The aggregation every value column is computed with
pub const AGGREGATION_FUNCTION: AggregationFunction = AggregationFunction::Sum;

#[derive(Debug, Clone, PartialEq)]
pub struct RequestWindow {
    pub start_row: u64,
    pub end_row: u64,
    /// Values of the already expanded groups, outermost first
    pub group_keys: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestPlan {
    pub request: AggregateRequest,
    /// The fields each returned index value is assigned to
    pub active_group_fields: Vec<String>,
    pub is_top_level: bool,
}

/// Plans the aggregation request for one row fetch.
///
/// Grouping dimensions are consumed one level per expansion: with `n` group
/// keys the next dimension is `row_group_fields[n]`, and the first `n`
/// dimensions become an equality row filter. When the table has no active row
/// groups the full configured grouping set is requested instead.
pub fn plan_request(
    config: &Config,
    row_group_fields: &[String],
    window: &RequestWindow,
) -> Result<RequestPlan, PivotError> {
    if window.end_row < window.start_row {
        return Err(PivotError::InvalidWindow {
            start_row: window.start_row,
            end_row: window.end_row,
        });
    }

    let depth = window.group_keys.len();

    let index = if row_group_fields.is_empty() {
        if depth > 0 {
            return Err(PivotError::GroupDepthExceeded {
                group_keys: depth,
                row_group_cols: 0,
            });
        }
        config.row_group_fields()
    } else {
        let next = row_group_fields
            .get(depth)
            .ok_or(PivotError::GroupDepthExceeded {
                group_keys: depth,
                row_group_cols: row_group_fields.len(),
            })?;
        vec![next.clone()]
    };

    if index.is_empty() {
        return Err(PivotError::NoGroupFields);
    }

    let rowfilter = row_group_fields
        .iter()
        .zip(&window.group_keys)
        .map(|(field, key)| (field.clone(), key.clone()))
        .collect();

    let request = AggregateRequest {
        url: config.dataset_url.clone(),
        values: config.value_fields(),
        index: index.clone(),
        columns: config.pivot_fields(),
        rowfilter,
        aggfunc: AGGREGATION_FUNCTION,
        startrow: window.start_row,
        endrow: window.end_row,
    };

    Ok(RequestPlan {
        request,
        active_group_fields: index,
        is_top_level: depth == 0,
    })
}
