use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::pivot::RowRecord;

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowsResponse {
    /// One record per row group, keyed by group field and flat column id
    pub row_data: Vec<RowRecord>,
    /// The total row count of the group level, omitted while more rows may follow
    pub row_count: Option<u64>,
}
