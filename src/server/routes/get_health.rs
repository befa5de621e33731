use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tracing::warn;

use crate::server::AppState;

#[axum_macros::debug_handler]
pub async fn get_health(State(state): State<AppState>) -> impl IntoResponse {
    match state.service.ping().await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(err) => {
            warn!(%err, "aggregation service health check failed");
            StatusCode::GATEWAY_TIMEOUT
        }
    }
}
