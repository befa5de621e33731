use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;

use crate::server::{
    api::{rows_request::RowsRequest, rows_response::RowsResponse},
    error::ServerError,
    orchestrator::fetch_rows,
    AppState,
};

#[axum_macros::debug_handler]
pub async fn post_rows(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<RowsRequest>, ServerError>,
) -> Result<Json<RowsResponse>, ServerError> {
    let response = fetch_rows(
        state.service.as_ref(),
        &state.config,
        &state.registry,
        &request,
    )
    .await?;

    Ok(Json(response))
}
