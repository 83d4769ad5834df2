//! Cache block of quote rows.

use crate::model::QuoteRow;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Inclusive timestamp range held by the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSpan {
    /// First timestamp of the block.
    pub start: NaiveDateTime,
    /// Last timestamp of the block.
    pub end: NaiveDateTime,
}

impl CacheSpan {
    /// Creates a span.
    #[must_use]
    pub const fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Returns true if `timestamp` lies within the span.
    #[must_use]
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

/// Rows of one loaded block, grouped by observation timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheBlock {
    span: CacheSpan,
    rows: BTreeMap<NaiveDateTime, Vec<QuoteRow>>,
}

impl CacheBlock {
    /// Groups `rows` by timestamp, preserving their order within a timestamp.
    #[must_use]
    pub fn new(span: CacheSpan, rows: Vec<QuoteRow>) -> Self {
        let mut grouped: BTreeMap<NaiveDateTime, Vec<QuoteRow>> = BTreeMap::new();
        for row in rows {
            grouped.entry(row.quote_datetime).or_default().push(row);
        }
        Self {
            span,
            rows: grouped,
        }
    }

    /// Returns the span.
    #[must_use]
    pub const fn span(&self) -> CacheSpan {
        self.span
    }

    /// Returns the rows observed at exactly `timestamp`.
    #[must_use]
    pub fn rows_at(&self, timestamp: NaiveDateTime) -> &[QuoteRow] {
        self.rows
            .get(&timestamp)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the total number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }
}
