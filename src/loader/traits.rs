//! Loader and subscriber contracts.

use super::cache::CacheSpan;
use crate::error::Result;
use crate::model::{FieldSet, OptionRecord, SelectFilter};
use chrono::NaiveDateTime;

/// Receiver of assembled option chains.
///
/// Notification is synchronous: the loader calls [`on_chain`] on the caller's
/// thread before `get_next_option_chain` returns, and an error returned here
/// is propagated to that caller.
///
/// Any `FnMut(NaiveDateTime, &[OptionRecord]) -> Result<()>` closure is a
/// subscriber.
///
/// [`on_chain`]: ChainSubscriber::on_chain
pub trait ChainSubscriber {
    /// Handles the chain observed at `timestamp`. The chain may be empty.
    ///
    /// # Errors
    ///
    /// Any error is returned unchanged from `get_next_option_chain`.
    fn on_chain(&mut self, timestamp: NaiveDateTime, chain: &[OptionRecord]) -> Result<()>;
}

impl<F> ChainSubscriber for F
where
    F: FnMut(NaiveDateTime, &[OptionRecord]) -> Result<()>,
{
    fn on_chain(&mut self, timestamp: NaiveDateTime, chain: &[OptionRecord]) -> Result<()> {
        self(timestamp, chain)
    }
}

/// A loader serving option chains for one symbol over a fixed date range.
pub trait DataLoader {
    /// Start of the loader's date range.
    fn start(&self) -> NaiveDateTime;

    /// End of the loader's date range.
    fn end(&self) -> NaiveDateTime;

    /// The selection criteria applied to every retrieval.
    fn select_filter(&self) -> &SelectFilter;

    /// The requested fields.
    fn fields(&self) -> &FieldSet;

    /// Every observation timestamp in the range, ascending.
    fn timestamps(&self) -> &[NaiveDateTime];

    /// The range currently held in the cache, if any block has been loaded.
    fn cache_span(&self) -> Option<CacheSpan>;

    /// Loads the block beginning at `from_timestamp`, replacing the current
    /// one.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if `from_timestamp` is not indexed, or a
    /// store error if the retrieval fails. The previous block is kept on
    /// error.
    fn load_cache(&mut self, from_timestamp: NaiveDateTime) -> Result<()>;

    /// Returns the chain observed at `timestamp` and publishes it to the
    /// bound subscriber.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfRange` outside the loader's range,
    /// `Error::NotFound` for a timestamp without observations, a store error
    /// if a refill fails, or the subscriber's error.
    fn get_next_option_chain(&mut self, timestamp: NaiveDateTime) -> Result<Vec<OptionRecord>>;

    /// Registers the subscriber, replacing any previous one.
    fn bind(&mut self, subscriber: Box<dyn ChainSubscriber>);
}
