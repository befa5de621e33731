use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Debug,
    Serialize,
    Deserialize,
    Hash,
    Eq,
    PartialEq,
    Clone,
    Copy,
    Display,
    EnumString,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AggregationFunction {
    Sum,
    Mean,
    Median,
    Min,
    Max,
    Count,
}
