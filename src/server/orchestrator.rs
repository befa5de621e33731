use tracing::{debug, info_span, Instrument};

use crate::pivot::{estimate_page, plan_request, transform_response, AggregateResponse};

use super::{
    api::{rows_request::RowsRequest, rows_response::RowsResponse},
    client::AggregationService,
    config::Config,
    error::ServerError,
    registry::PivotColumnRegistry,
};

/// Serves one row range or group expansion request.
///
/// Exactly one aggregation request is dispatched. Rows are only returned, and
/// pivot columns only published, once the whole response has been validated
/// and transformed; any failure leaves the registry untouched.
pub async fn fetch_rows(
    service: &dyn AggregationService,
    config: &Config,
    registry: &PivotColumnRegistry,
    request: &RowsRequest,
) -> Result<RowsResponse, ServerError> {
    let window = request.window();
    let plan = plan_request(config, &request.row_group_fields(), &window)?;

    // reserved before dispatch so a slower, older top level fetch cannot win
    let sequence = plan.is_top_level.then(|| registry.reserve_sequence());

    let raw = service
        .aggregate(&plan.request)
        .instrument(info_span!(
            "aggregate",
            index = ?plan.request.index,
            depth = window.group_keys.len(),
            aggfunc = %plan.request.aggfunc,
            start_row = window.start_row,
            end_row = window.end_row,
        ))
        .await?;

    let response = AggregateResponse::try_from(raw).map_err(ServerError::upstream)?;
    let transformed = transform_response(
        &response,
        &plan.active_group_fields,
        plan.is_top_level,
        &config.expandable_leaves(),
    )
    .map_err(ServerError::upstream)?;

    let page = estimate_page(window.start_row, window.end_row, transformed.rows.len());
    debug!(
        rows = transformed.rows.len(),
        next_row = page.next_row,
        row_count = ?page.row_count,
        "transformed aggregate result"
    );

    if let (Some(sequence), Some(columns)) = (sequence, transformed.pivot_columns) {
        registry.publish(sequence, columns);
    }

    Ok(RowsResponse {
        row_data: transformed.rows,
        row_count: page.row_count.known(),
    })
}
