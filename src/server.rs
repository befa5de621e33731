pub mod api;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Uri},
    routing::{get, post},
    Router,
};
use axum_tracing_opentelemetry::opentelemetry_tracing_layer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

mod client;
pub mod config;
mod error;
mod orchestrator;
mod registry;
mod routes;
use self::routes::*;

use self::{
    client::{AggregationService, HttpAggregationService},
    config::Config,
    error::ServerError,
    registry::PivotColumnRegistry,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: PivotColumnRegistry,
    pub service: Arc<dyn AggregationService>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let service = HttpAggregationService::new(config.aggregation_url.clone());
        Self {
            config: Arc::new(config),
            registry: PivotColumnRegistry::default(),
            service: Arc::new(service),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/capabilities", get(get_capabilities))
        .route("/columns", get(get_columns))
        .route("/rows", post(post_rows))
        .route("/health", get(get_health))
        .fallback(not_found)
        .layer(opentelemetry_tracing_layer())
        .layer(cors)
        .with_state(state)
}

/// The table runs in a browser on another origin, so every route answers CORS
/// preflights. Without configured origins any origin is allowed.
fn cors_layer(config: &Config) -> CorsLayer {
    let Some(origins) = &config.cors_origins else {
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!("Ignoring invalid cors origin {:?}: {}", origin, err);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn not_found(uri: Uri) -> ServerError {
    ServerError::NotFound(uri)
}
