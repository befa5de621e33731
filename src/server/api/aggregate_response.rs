use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The aggregation service's result, a split orientation table. Validated into
/// [`crate::pivot::AggregateResponse`] before use.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawAggregateResponse {
    /// One key path per result column
    pub columns: Vec<Vec<Value>>,
    /// Row major result cells
    pub data: Vec<Vec<Value>>,
    /// One row group value per result row
    pub index: Vec<Value>,
}
