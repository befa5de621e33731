use axum::{extract::State, Json};
use schemars::schema_for;

use crate::pivot::AGGREGATION_FUNCTION;
use crate::server::{
    api::capabilities_response::{CapabilitiesResponse, LayoutCapabilities, ValueColumn},
    config::Config,
    AppState,
};

#[axum_macros::debug_handler]
pub async fn get_capabilities(State(state): State<AppState>) -> Json<CapabilitiesResponse> {
    Json(CapabilitiesResponse {
        display_name: Some("Pivot Datasource".to_owned()),
        release_name: Some(env!("CARGO_PKG_VERSION").to_owned()),
        config_schema: schema_for!(Config),
        layout: layout(&state.config),
    })
}

fn layout(config: &Config) -> LayoutCapabilities {
    LayoutCapabilities {
        row_groups: config.row_group_fields(),
        pivots: config.pivot_fields(),
        values: config
            .columns
            .iter()
            .filter_map(|column| {
                column.agg_func.map(|agg_func| ValueColumn {
                    field: column.field.clone(),
                    agg_func,
                })
            })
            .collect(),
        expandable_columns: config.expandable_columns.clone(),
        aggregation_function: AGGREGATION_FUNCTION,
        supported_aggregation_functions: vec![AGGREGATION_FUNCTION],
    }
}

#[cfg(test)]
mod tests {
    use crate::server::api::aggregate_request::AggregationFunction;

    use super::*;

    #[test]
    fn describes_configured_layout() {
        let layout = layout(&Config::default());

        assert_eq!(layout.row_groups, vec!["country", "sport"]);
        assert_eq!(layout.pivots, vec!["year"]);
        assert_eq!(layout.values.len(), 4);
        assert_eq!(layout.values[0].field, "total");
        assert_eq!(layout.expandable_columns, vec!["total"]);
        assert_eq!(
            layout.supported_aggregation_functions,
            vec![AggregationFunction::Sum]
        );
    }
}
