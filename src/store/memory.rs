//! In-memory quote store.
//!
//! Evaluates queries directly against decoded rows. The selection helpers in
//! this module are shared with the flat-file store, which streams its rows
//! through the same filter.

use super::traits::QuoteStore;
use crate::error::Result;
use crate::model::{QuoteField, QuoteRow};
use crate::query::Query;
use chrono::NaiveDateTime;
use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Quote store backed by a vector of rows.
#[derive(Debug, Default)]
pub struct MemoryQuoteStore {
    rows: Vec<QuoteRow>,
    fetches: Cell<usize>,
}

impl MemoryQuoteStore {
    /// Creates a store holding `rows`.
    #[must_use]
    pub fn new(rows: Vec<QuoteRow>) -> Self {
        Self {
            rows,
            fetches: Cell::new(0),
        }
    }

    /// Returns the number of rows held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the store holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of block fetches served so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

impl QuoteStore for MemoryQuoteStore {
    fn distinct_timestamps(&self, query: &Query) -> Result<Vec<NaiveDateTime>> {
        select_timestamps(self.rows.iter().cloned().map(Ok), query)
    }

    fn fetch(&self, query: &Query) -> Result<Vec<QuoteRow>> {
        self.fetches.set(self.fetches.get() + 1);
        select_rows(self.rows.iter().cloned().map(Ok), query)
    }
}

/// Keeps the rows matching the query filter, clears unprojected columns and
/// sorts by the query order.
pub(crate) fn select_rows<I>(rows: I, query: &Query) -> Result<Vec<QuoteRow>>
where
    I: IntoIterator<Item = Result<QuoteRow>>,
{
    let columns = query.columns();
    let mut selected = Vec::new();
    for row in rows {
        let mut row = row?;
        if query.filter().matches(&row) {
            row.retain_columns(&columns);
            selected.push(row);
        }
    }
    sort_rows(&mut selected, query.order_by());
    Ok(selected)
}

/// Collects the distinct, ascending timestamps of the rows matching the
/// query filter.
pub(crate) fn select_timestamps<I>(rows: I, query: &Query) -> Result<Vec<NaiveDateTime>>
where
    I: IntoIterator<Item = Result<QuoteRow>>,
{
    let mut timestamps = BTreeSet::new();
    for row in rows {
        let row = row?;
        if query.filter().matches(&row) {
            timestamps.insert(row.quote_datetime);
        }
    }
    Ok(timestamps.into_iter().collect())
}

/// Stable ascending sort on `order_by`; missing values sort first.
pub(crate) fn sort_rows(rows: &mut [QuoteRow], order_by: &[QuoteField]) {
    rows.sort_by(|a, b| {
        order_by
            .iter()
            .map(|field| match (a.value(*field), b.value(*field)) {
                (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}
