//! Backing-store contract.

use crate::error::Result;
use crate::model::QuoteRow;
use crate::query::Query;
use chrono::NaiveDateTime;

/// A source of historical option quotes.
///
/// Implementations must be able to answer both query shapes built by
/// [`Query`]: a distinct-timestamp projection and a filtered, sorted block
/// retrieval. Each call is a complete, blocking round trip; nothing is held
/// open between calls.
pub trait QuoteStore {
    /// Returns the distinct observation timestamps matched by `query`, in
    /// ascending order.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoreConnection` if the store cannot be read.
    fn distinct_timestamps(&self, query: &Query) -> Result<Vec<NaiveDateTime>>;

    /// Returns the rows matched by `query`, restricted to its projection and
    /// sorted by its order.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoreConnection` if the store cannot be read, or
    /// `Error::InvalidRow` if a row cannot be decoded.
    fn fetch(&self, query: &Query) -> Result<Vec<QuoteRow>>;
}
