use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details
    pub details: Option<serde_json::Value>,
    /// Error message
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ErrorResponseType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorResponseType {
    #[serde(rename = "uncaught-error")]
    UncaughtError,
    /// The aggregation service could not be reached or answered with a failure status
    #[serde(rename = "transport-error")]
    TransportError,
    /// The aggregation service answered with a malformed result
    #[serde(rename = "shape-error")]
    ShapeError,
    /// The request or the configured layout cannot be turned into pivot columns
    #[serde(rename = "config-error")]
    ConfigError,
}
