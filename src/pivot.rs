mod column_tree;
mod error;
pub mod key_codec;
mod pagination;
mod request_plan;
mod row_transform;

pub use column_tree::{
    build_pivot_columns, ColumnNode, ColumnTreeBuilder, ExpandState, GroupColumn, LeafColumn,
};
pub use error::PivotError;
pub use pagination::{estimate_page, PageEstimate, RowCount};
pub use request_plan::{plan_request, RequestPlan, RequestWindow, AGGREGATION_FUNCTION};
pub use row_transform::{
    transform_response, transform_rows, AggregateResponse, RowRecord, TransformedRows,
};

/// The ordered segments identifying one pivot result column, e.g. `["2008", "gold"]`
pub type KeyPath = Vec<String>;
