use schemars::schema::RootSchema;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::aggregate_request::AggregationFunction;

#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    pub layout: LayoutCapabilities,
    /// JSON schema of the configuration file
    pub config_schema: RootSchema,
    pub display_name: Option<String>,
    pub release_name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LayoutCapabilities {
    /// Fields grouped into rows, outermost first
    pub row_groups: Vec<String>,
    /// Fields pivoted into columns
    pub pivots: Vec<String>,
    pub values: Vec<ValueColumn>,
    /// Value columns rendered as a collapsed total with an expandable breakdown
    pub expandable_columns: Vec<String>,
    /// Aggregation function applied to every value by the aggregation service
    pub aggregation_function: AggregationFunction,
    pub supported_aggregation_functions: Vec<AggregationFunction>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ValueColumn {
    pub field: String,
    pub agg_func: AggregationFunction,
}
