use std::{collections::HashSet, error::Error, fs, path::Path};

use axum::http::HeaderValue;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::api::aggregate_request::AggregationFunction;
use crate::pivot::{PivotError, AGGREGATION_FUNCTION};

const DEFAULT_AGGREGATION_URL: &str = "http://localhost:8000";
const DEFAULT_DATASET_URL: &str = "https://www.ag-grid.com/example-assets/olympic-winners.json";

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// The url of the aggregation service
    #[serde(default = "default_aggregation_url")]
    pub aggregation_url: String,
    /// The url of the dataset the aggregation service loads and pivots
    pub dataset_url: String,
    /// The table's columns, in display order
    pub columns: Vec<ColumnConfig>,
    /// Value columns rendered as a collapsed total with an expandable breakdown
    /// inside each pivot group
    #[serde(default)]
    pub expandable_columns: Vec<String>,
    /// Origins allowed to call the service from a browser. Any origin when unset
    pub cors_origins: Option<Vec<String>>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ColumnConfig {
    /// The dataset field
    pub field: String,
    /// Whether the field's values group rows
    #[serde(default)]
    pub row_group: bool,
    /// Whether the field's values become columns
    #[serde(default)]
    pub pivot: bool,
    /// Optional aggregation, marks the field as a value column
    pub agg_func: Option<AggregationFunction>,
}

fn default_aggregation_url() -> String {
    DEFAULT_AGGREGATION_URL.to_owned()
}

impl ColumnConfig {
    fn new(field: &str) -> Self {
        Self {
            field: field.to_owned(),
            row_group: false,
            pivot: false,
            agg_func: None,
        }
    }
}

impl Default for Config {
    /// The olympic medals layout: medals summed by country and sport, pivoted by year
    fn default() -> Self {
        let value = |field: &str| ColumnConfig {
            agg_func: Some(AggregationFunction::Sum),
            ..ColumnConfig::new(field)
        };

        Self {
            aggregation_url: default_aggregation_url(),
            dataset_url: DEFAULT_DATASET_URL.to_owned(),
            columns: vec![
                ColumnConfig {
                    row_group: true,
                    ..ColumnConfig::new("country")
                },
                ColumnConfig {
                    row_group: true,
                    ..ColumnConfig::new("sport")
                },
                ColumnConfig {
                    pivot: true,
                    ..ColumnConfig::new("year")
                },
                value("total"),
                value("gold"),
                value("silver"),
                value("bronze"),
            ],
            expandable_columns: vec!["total".to_owned()],
            cors_origins: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.value_fields().is_empty() {
            return Err("Configuration must declare at least one column with an agg_func".into());
        }

        for column in &self.columns {
            match column.agg_func {
                Some(agg_func) if agg_func != AGGREGATION_FUNCTION => {
                    return Err(PivotError::UnsupportedAggregation {
                        field: column.field.clone(),
                        agg_func,
                    }
                    .into())
                }
                _ => {}
            }
        }

        for origin in self.cors_origins.iter().flatten() {
            HeaderValue::from_str(origin)
                .map_err(|err| format!("Invalid cors origin {:?}: {}", origin, err))?;
        }

        Ok(())
    }

    pub fn row_group_fields(&self) -> Vec<String> {
        self.fields_where(|column| column.row_group)
    }

    pub fn pivot_fields(&self) -> Vec<String> {
        self.fields_where(|column| column.pivot)
    }

    pub fn value_fields(&self) -> Vec<String> {
        self.fields_where(|column| column.agg_func.is_some())
    }

    pub fn expandable_leaves(&self) -> HashSet<String> {
        self.expandable_columns.iter().cloned().collect()
    }

    fn fields_where(&self, predicate: impl Fn(&ColumnConfig) -> bool) -> Vec<String> {
        self.columns
            .iter()
            .filter(|column| predicate(column))
            .map(|column| column.field.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn default_layout_matches_medal_table() {
        let config = Config::default();
        assert_eq!(config.row_group_fields(), vec!["country", "sport"]);
        assert_eq!(config.pivot_fields(), vec!["year"]);
        assert_eq!(
            config.value_fields(),
            vec!["total", "gold", "silver", "bronze"]
        );
        assert!(config.expandable_leaves().contains("total"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: Config = serde_json::from_value(json!({
            "dataset_url": "https://example.com/sales.json",
            "columns": [
                { "field": "region", "row_group": true },
                { "field": "quarter", "pivot": true },
                { "field": "revenue", "agg_func": "sum" }
            ]
        }))
        .unwrap();

        assert_eq!(config.aggregation_url, DEFAULT_AGGREGATION_URL);
        assert!(config.expandable_columns.is_empty());
        assert_eq!(config.value_fields(), vec!["revenue"]);
        assert!(config.cors_origins.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn rejects_aggregations_the_service_is_never_asked_for() {
        let config: Config = serde_json::from_value(json!({
            "dataset_url": "https://example.com/sales.json",
            "columns": [
                { "field": "region", "row_group": true },
                { "field": "revenue", "agg_func": "sum" },
                { "field": "price", "agg_func": "mean" }
            ]
        }))
        .unwrap();

        let err = config.validate().unwrap_err();
        assert_eq!(
            err.downcast_ref::<PivotError>(),
            Some(&PivotError::UnsupportedAggregation {
                field: "price".to_owned(),
                agg_func: AggregationFunction::Mean,
            })
        );
    }

    #[test]
    fn rejects_layout_without_value_columns() {
        let config = Config {
            columns: vec![ColumnConfig::new("region")],
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unencodable_cors_origin() {
        let config = Config {
            cors_origins: Some(vec!["https://grid.example.com\n".to_owned()]),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            cors_origins: Some(vec!["https://grid.example.com".to_owned()]),
            ..Config::default()
        };
        config.validate().unwrap();
    }
}
