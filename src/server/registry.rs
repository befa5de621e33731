use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, PoisonError, RwLock,
};

use tracing::debug;

use crate::pivot::ColumnNode;

use super::api::columns_response::ColumnsResponse;

#[derive(Default)]
struct Published {
    sequence: u64,
    columns: Vec<ColumnNode>,
}

/// The pivot result columns last built by a top level fetch.
///
/// Every top level fetch reserves a sequence token before it is dispatched, and
/// its columns are only published if no later fetch has published first.
#[derive(Clone, Default)]
pub struct PivotColumnRegistry {
    next_sequence: Arc<AtomicU64>,
    published: Arc<RwLock<Published>>,
}

impl PivotColumnRegistry {
    pub fn reserve_sequence(&self) -> u64 {
        self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Returns false when the columns were built by a fetch older than the published ones.
    pub fn publish(&self, sequence: u64, columns: Vec<ColumnNode>) -> bool {
        let mut published = self
            .published
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if sequence <= published.sequence {
            debug!(
                sequence,
                published = published.sequence,
                "discarding stale pivot columns"
            );
            return false;
        }

        published.sequence = sequence;
        published.columns = columns;
        true
    }

    pub fn snapshot(&self) -> ColumnsResponse {
        let published = self
            .published
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        ColumnsResponse {
            sequence: published.sequence,
            columns: published.columns.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::pivot::LeafColumn;

    use super::*;

    fn columns(name: &str) -> Vec<ColumnNode> {
        vec![ColumnNode::Leaf(LeafColumn {
            flat_id: name.to_string(),
            display_name: name.to_string(),
            expand_state: Default::default(),
        })]
    }

    #[test]
    fn starts_empty() {
        let snapshot = PivotColumnRegistry::default().snapshot();
        assert_eq!(snapshot.sequence, 0);
        assert!(snapshot.columns.is_empty());
    }

    #[test]
    fn stale_fetch_cannot_overwrite_newer_columns() {
        let registry = PivotColumnRegistry::default();
        let older = registry.reserve_sequence();
        let newer = registry.reserve_sequence();

        assert!(registry.publish(newer, columns("2012")));
        assert!(!registry.publish(older, columns("2008")));

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.sequence, newer);
        assert_eq!(snapshot.columns, columns("2012"));
    }

    #[test]
    fn clones_share_state() {
        let registry = PivotColumnRegistry::default();
        let handle = registry.clone();

        let sequence = handle.reserve_sequence();
        handle.publish(sequence, columns("2008"));

        assert_eq!(registry.snapshot().columns, columns("2008"));
    }
}
