use serde::{Deserialize, Serialize};

use crate::pivot::ColumnNode;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColumnsResponse {
    /// Sequence token of the top level fetch that built these columns, 0 before the first one
    pub sequence: u64,
    pub columns: Vec<ColumnNode>,
}
