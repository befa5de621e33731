use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

use crate::pivot::RequestWindow;

/// A row range or group expansion request from the table's server side row model.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowsRequest {
    /// Values of the expanded groups leading to the requested level
    #[serde(default)]
    pub group_keys: Vec<Value>,
    /// The active row group columns, outermost first
    #[serde(default)]
    pub row_group_cols: Vec<ColumnVo>,
    pub start_row: u64,
    pub end_row: u64,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnVo {
    pub id: String,
    pub display_name: Option<String>,
    pub field: Option<String>,
}

impl ColumnVo {
    pub fn field_name(&self) -> &str {
        self.field.as_deref().unwrap_or(&self.id)
    }
}

impl RowsRequest {
    pub fn row_group_fields(&self) -> Vec<String> {
        self.row_group_cols
            .iter()
            .map(|column| column.field_name().to_owned())
            .collect()
    }

    pub fn window(&self) -> RequestWindow {
        RequestWindow {
            start_row: self.start_row,
            end_row: self.end_row,
            group_keys: self.group_keys.clone(),
        }
    }
}
