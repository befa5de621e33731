use axum::{extract::State, Json};

use crate::server::{api::columns_response::ColumnsResponse, AppState};

#[axum_macros::debug_handler]
pub async fn get_columns(State(state): State<AppState>) -> Json<ColumnsResponse> {
    Json(state.registry.snapshot())
}
