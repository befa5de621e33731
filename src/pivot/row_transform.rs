use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::server::api::aggregate_response::RawAggregateResponse;

use super::{build_pivot_columns, key_codec, ColumnNode, KeyPath, PivotError};

pub type RowRecord = IndexMap<String, Value>;

/// A validated aggregate response. `data` has one row per `index` value and
/// every row has one cell per column.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateResponse {
    pub columns: Vec<KeyPath>,
    pub data: Vec<Vec<Option<Number>>>,
    pub index: Vec<Value>,
}

impl TryFrom<RawAggregateResponse> for AggregateResponse {
    type Error = PivotError;

    fn try_from(raw: RawAggregateResponse) -> Result<Self, Self::Error> {
        let columns = raw
            .columns
            .into_iter()
            .enumerate()
            .map(|(column, key_path)| {
                key_path
                    .into_iter()
                    .map(|segment| key_segment(column, segment))
                    .collect::<Result<KeyPath, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        if raw.data.len() != raw.index.len() {
            return Err(PivotError::RowCountMismatch {
                data_rows: raw.data.len(),
                index_rows: raw.index.len(),
            });
        }

        let data = raw
            .data
            .into_iter()
            .enumerate()
            .map(|(row, cells)| {
                if cells.len() != columns.len() {
                    return Err(PivotError::RowWidthMismatch {
                        row,
                        expected: columns.len(),
                        actual: cells.len(),
                    });
                }
                cells
                    .into_iter()
                    .enumerate()
                    .map(|(column, cell)| match cell {
                        Value::Number(number) => Ok(Some(number)),
                        Value::Null => Ok(None),
                        value => Err(PivotError::InvalidCell { row, column, value }),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<Vec<Option<Number>>>, _>>()?;

        Ok(Self {
            columns,
            data,
            index: raw.index,
        })
    }
}

// numeric segments come from pivoting over numeric dimensions, e.g. years
fn key_segment(column: usize, segment: Value) -> Result<String, PivotError> {
    match segment {
        Value::String(segment) => Ok(segment),
        Value::Number(number) => Ok(number.to_string()),
        value => Err(PivotError::InvalidSegment { column, value }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformedRows {
    pub rows: Vec<RowRecord>,
    /// Only rebuilt for top level fetches
    pub pivot_columns: Option<Vec<ColumnNode>>,
}

pub fn transform_rows(
    response: &AggregateResponse,
    active_group_fields: &[String],
) -> Result<Vec<RowRecord>, PivotError> {
    if active_group_fields.is_empty() {
        return Err(PivotError::NoGroupFields);
    }

    let flat_ids = response
        .columns
        .iter()
        .map(|key_path| key_codec::encode(key_path))
        .collect::<Result<Vec<_>, _>>()?;

    response
        .index
        .iter()
        .zip(&response.data)
        .enumerate()
        .map(|(row, (index_value, cells))| {
            let mut record = RowRecord::with_capacity(active_group_fields.len() + cells.len());

            match active_group_fields {
                [field] => {
                    if matches!(index_value, Value::Array(_) | Value::Object(_)) {
                        return Err(PivotError::InvalidIndexValue {
                            row,
                            value: index_value.clone(),
                        });
                    }
                    record.insert(field.clone(), index_value.clone());
                }
                fields => {
                    let Value::Array(levels) = index_value else {
                        return Err(PivotError::IndexArityMismatch {
                            row,
                            expected: fields.len(),
                            actual: 1,
                        });
                    };
                    if levels.len() != fields.len() {
                        return Err(PivotError::IndexArityMismatch {
                            row,
                            expected: fields.len(),
                            actual: levels.len(),
                        });
                    }
                    for (field, level) in fields.iter().zip(levels) {
                        record.insert(field.clone(), level.clone());
                    }
                }
            }

            for (flat_id, cell) in flat_ids.iter().zip(cells) {
                let value = cell.clone().map(Value::Number).unwrap_or(Value::Null);
                record.insert(flat_id.clone(), value);
            }

            Ok(record)
        })
        .collect()
}

/// Turns a response into row records, and on top level fetches also rebuilds
/// the pivot column tree. Nothing is returned unless both steps succeed.
pub fn transform_response(
    response: &AggregateResponse,
    active_group_fields: &[String],
    is_top_level: bool,
    expandable_leaves: &HashSet<String>,
) -> Result<TransformedRows, PivotError> {
    let pivot_columns = if is_top_level {
        Some(build_pivot_columns(&response.columns, expandable_leaves)?)
    } else {
        None
    };

    let rows = transform_rows(response, active_group_fields)?;

    Ok(TransformedRows {
        rows,
        pivot_columns,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: Value) -> Result<AggregateResponse, PivotError> {
        let raw: RawAggregateResponse = serde_json::from_value(value).unwrap();
        AggregateResponse::try_from(raw)
    }

    fn fields(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn builds_one_record_per_row_group() {
        let response = parse(json!({
            "columns": [["2008"]],
            "data": [[5], [7]],
            "index": ["US", "FR"]
        }))
        .unwrap();

        let rows = transform_rows(&response, &fields(&["country"])).unwrap();

        assert_eq!(
            serde_json::to_value(&rows).unwrap(),
            json!([
                { "country": "US", "2008": 5 },
                { "country": "FR", "2008": 7 }
            ])
        );
    }

    #[test]
    fn encodes_key_paths_and_keeps_missing_cells() {
        let response = parse(json!({
            "columns": [[2008, "gold"], [2008, "total"], [2012, "gold"]],
            "data": [[1.0, 3.5, null]],
            "index": ["Sweden"]
        }))
        .unwrap();

        let rows = transform_rows(&response, &fields(&["country"])).unwrap();
        let record = &rows[0];

        assert_eq!(
            record.keys().collect::<Vec<_>>(),
            vec!["country", "2008|gold", "2008|total", "2012|gold"]
        );
        assert_eq!(record["2008|total"], json!(3.5));
        assert_eq!(record["2012|gold"], Value::Null);
    }

    #[test]
    fn splits_multi_level_index_across_group_fields() {
        let response = parse(json!({
            "columns": [["2008", "gold"]],
            "data": [[2]],
            "index": [["US", "Swimming"]]
        }))
        .unwrap();

        let rows = transform_rows(&response, &fields(&["country", "sport"])).unwrap();

        assert_eq!(
            serde_json::to_value(&rows).unwrap(),
            json!([{ "country": "US", "sport": "Swimming", "2008|gold": 2 }])
        );

        let err = transform_rows(&response, &fields(&["country", "sport", "year"])).unwrap_err();
        assert_eq!(
            err,
            PivotError::IndexArityMismatch {
                row: 0,
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn rejects_misshapen_responses() {
        let err = parse(json!({
            "columns": [["2008"]],
            "data": [[5]],
            "index": ["US", "FR"]
        }))
        .unwrap_err();
        assert_eq!(
            err,
            PivotError::RowCountMismatch {
                data_rows: 1,
                index_rows: 2
            }
        );

        let err = parse(json!({
            "columns": [["2008"], ["2012"]],
            "data": [[5, 6], [7]],
            "index": ["US", "FR"]
        }))
        .unwrap_err();
        assert_eq!(
            err,
            PivotError::RowWidthMismatch {
                row: 1,
                expected: 2,
                actual: 1
            }
        );

        let err = parse(json!({
            "columns": [["2008"]],
            "data": [["five"]],
            "index": ["US"]
        }))
        .unwrap_err();
        assert!(err.is_shape_error());

        let err = parse(json!({
            "columns": [[{ "year": 2008 }]],
            "data": [],
            "index": []
        }))
        .unwrap_err();
        assert!(matches!(err, PivotError::InvalidSegment { column: 0, .. }));
    }

    #[test]
    fn only_top_level_rebuilds_columns() {
        let response = parse(json!({
            "columns": [["2008", "total"]],
            "data": [[5]],
            "index": ["US"]
        }))
        .unwrap();
        let expandable = HashSet::from(["total".to_string()]);

        let top = transform_response(&response, &fields(&["country"]), true, &expandable).unwrap();
        assert_eq!(top.pivot_columns.map(|columns| columns.len()), Some(1));

        let nested =
            transform_response(&response, &fields(&["sport"]), false, &expandable).unwrap();
        assert_eq!(nested.pivot_columns, None);
        assert_eq!(nested.rows[0]["sport"], json!("US"));
    }

    #[test]
    fn column_build_failure_yields_no_rows() {
        let response = parse(json!({
            "columns": [["US|FR", "gold"]],
            "data": [[1]],
            "index": ["Swimming"]
        }))
        .unwrap();

        let err =
            transform_response(&response, &fields(&["sport"]), true, &HashSet::new()).unwrap_err();
        assert!(matches!(err, PivotError::SeparatorInSegment { .. }));
    }
}
