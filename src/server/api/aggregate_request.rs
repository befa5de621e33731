use serde::{Deserialize, Serialize};
use serde_json::Value;

mod aggregation_function;

pub use aggregation_function::AggregationFunction;

/// A `[field, value]` equality filter, serialized as a two element array
pub type RowFilter = (String, Value);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregateRequest {
    /// The dataset the aggregation service loads and pivots
    pub url: String,
    /// Fields aggregated into the result cells
    pub values: Vec<String>,
    /// Fields whose distinct values become result rows
    pub index: Vec<String>,
    /// Fields whose distinct values become result columns
    pub columns: Vec<String>,
    /// Only source rows matching every filter are aggregated
    pub rowfilter: Vec<RowFilter>,
    pub aggfunc: AggregationFunction,
    pub startrow: u64,
    pub endrow: u64,
}
