use axum::{
    extract::rejection::JsonRejection,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;
use tracing_opentelemetry_instrumentation_sdk::find_current_trace_id;

use crate::pivot::PivotError;

use super::{
    api::error_response::{ErrorResponse, ErrorResponseType},
    client::AggregationError,
};

#[derive(Debug)]
pub enum ServerError {
    NotFound(Uri),
    UncaughtError {
        details: Option<serde_json::Value>,
        message: String,
        error_type: ErrorResponseType,
    },
}

impl ServerError {
    fn uncaught(message: String, error_type: ErrorResponseType) -> Self {
        Self::UncaughtError {
            details: None,
            message,
            error_type,
        }
    }

    /// Anything wrong with the aggregation service's result is the service's
    /// fault, including keys this table cannot render.
    pub fn upstream(err: PivotError) -> Self {
        Self::uncaught(err.to_string(), ErrorResponseType::ShapeError)
    }

    pub fn error_type(&self) -> Option<ErrorResponseType> {
        match self {
            Self::NotFound(_) => None,
            Self::UncaughtError { error_type, .. } => Some(*error_type),
        }
    }
}

fn status_code(error_type: ErrorResponseType) -> StatusCode {
    match error_type {
        ErrorResponseType::UncaughtError | ErrorResponseType::ConfigError => {
            StatusCode::BAD_REQUEST
        }
        ErrorResponseType::TransportError | ErrorResponseType::ShapeError => {
            StatusCode::BAD_GATEWAY
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            Self::UncaughtError {
                details,
                message,
                error_type,
            } => {
                warn!(?error_type, %message, "row fetch failed");
                let details = details.or_else(|| {
                    find_current_trace_id().map(|trace_id| json!({ "trace_id": trace_id }))
                });
                (
                    status_code(error_type),
                    axum::Json(ErrorResponse {
                        details,
                        message,
                        error_type,
                    }),
                )
                    .into_response()
            }
            Self::NotFound(uri) => (
                StatusCode::NOT_FOUND,
                format!("Path not found: {}", uri.path()),
            )
                .into_response(),
        }
    }
}

impl From<PivotError> for ServerError {
    fn from(err: PivotError) -> Self {
        let error_type = if err.is_shape_error() {
            ErrorResponseType::ShapeError
        } else {
            ErrorResponseType::ConfigError
        };
        Self::uncaught(err.to_string(), error_type)
    }
}

impl From<AggregationError> for ServerError {
    fn from(err: AggregationError) -> Self {
        let error_type = match err {
            AggregationError::Decode(_) => ErrorResponseType::ShapeError,
            AggregationError::Transport(_) | AggregationError::Status { .. } => {
                ErrorResponseType::TransportError
            }
        };
        Self::uncaught(err.to_string(), error_type)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(err: JsonRejection) -> Self {
        Self::uncaught(err.to_string(), ErrorResponseType::UncaughtError)
    }
}
