//! Wire-side sort parameters, produced by the client's sort query
//! translator and consumed by [`crate::Connection::sort`].

/// Ordering direction for a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Offset/count window applied to the sorted sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortLimit {
    pub offset: u64,
    pub count: u64,
}

/// Fully translated sort parameters, patterns already serialized to bytes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SortParams {
    /// BY pattern directing the sort, if any.
    pub by_pattern: Option<Vec<u8>>,
    /// LIMIT window, if any.
    pub limit: Option<SortLimit>,
    /// GET patterns; their count fixes the record width of the flat reply.
    pub get_patterns: Vec<Vec<u8>>,
    /// Ordering direction.
    pub order: SortOrder,
    /// Lexicographic instead of numeric comparison.
    pub alphabetic: bool,
}

impl Default for SortLimit {
    fn default() -> Self {
        SortLimit { offset: 0, count: u64::MAX }
    }
}
