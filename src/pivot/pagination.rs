#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCount {
    Known(u64),
    /// The page was full, more rows may exist past the window
    Unknown,
}

impl RowCount {
    pub fn known(self) -> Option<u64> {
        match self {
            RowCount::Known(count) => Some(count),
            RowCount::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEstimate {
    /// First row after the rows just delivered
    pub next_row: u64,
    pub row_count: RowCount,
}

/// A short page means the end of the group level was reached, so the total
/// becomes exact. A full page leaves it open ended.
pub fn estimate_page(start_row: u64, end_row: u64, returned_rows: usize) -> PageEstimate {
    let next_row = start_row.saturating_add(returned_rows as u64);

    let row_count = if next_row < end_row {
        RowCount::Known(next_row)
    } else {
        RowCount::Unknown
    };

    PageEstimate {
        next_row,
        row_count,
    }
}
