//! Windowed loader over any [`QuoteStore`].
//!
//! The loader keeps a single block of rows covering a contiguous run of
//! indexed timestamps. A request inside the block is served from memory; a
//! request outside it replaces the block with the one starting at the
//! requested timestamp and extending `block_size` index entries further.

use super::cache::{CacheBlock, CacheSpan};
use super::chain::assemble_chain;
use super::index::TimestampIndex;
use super::traits::{ChainSubscriber, DataLoader};
use crate::config::DEFAULT_BLOCK_SIZE;
use crate::error::{Error, Result};
use crate::model::{FieldSet, OptionRecord, SelectFilter};
use crate::query::{Conjunction, Query};
use crate::store::{CsvQuoteStore, QuoteStore, SqliteQuoteStore};
use chrono::NaiveDateTime;
use std::fmt;
use tracing::{debug, trace};

/// Loader reading option chains from a SQLite database.
pub type SqlDataLoader = WindowedLoader<SqliteQuoteStore>;

/// Loader reading option chains from a CSV file.
pub type FileDataLoader = WindowedLoader<CsvQuoteStore>;

/// Windowed, block-cached option chain loader.
pub struct WindowedLoader<S> {
    store: S,
    start: NaiveDateTime,
    end: NaiveDateTime,
    filter: SelectFilter,
    selection: Conjunction,
    fields: FieldSet,
    block_size: usize,
    index: TimestampIndex,
    cache: Option<CacheBlock>,
    subscriber: Option<Box<dyn ChainSubscriber>>,
}

impl<S: QuoteStore> WindowedLoader<S> {
    /// Creates a loader and builds its timestamp index.
    ///
    /// No rows are loaded until the first chain is requested.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRange` if `start > end`, `Error::InvalidFilter`
    /// if a range bound does not match its field, or a store error if the
    /// index cannot be built.
    pub fn new(
        store: S,
        start: NaiveDateTime,
        end: NaiveDateTime,
        filter: SelectFilter,
        fields: FieldSet,
    ) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }
        let selection = Query::selection(&filter)?;

        let timestamps = store.distinct_timestamps(&Query::timestamp_index(
            filter.symbol(),
            start,
            end,
        ))?;
        let index = TimestampIndex::new(timestamps);
        debug!(
            symbol = filter.symbol(),
            %start,
            %end,
            timestamps = index.len(),
            "built timestamp index"
        );

        Ok(Self {
            store,
            start,
            end,
            filter,
            selection,
            fields,
            block_size: DEFAULT_BLOCK_SIZE,
            index,
            cache: None,
            subscriber: None,
        })
    }

    /// Sets the number of index entries fetched beyond the requested one.
    #[must_use]
    pub const fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Returns the block size.
    #[must_use]
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// Returns the backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns true if a subscriber is bound.
    #[must_use]
    pub fn has_subscriber(&self) -> bool {
        self.subscriber.is_some()
    }

    /// Returns the number of rows currently cached.
    #[must_use]
    pub fn cached_rows(&self) -> usize {
        self.cache.as_ref().map_or(0, CacheBlock::row_count)
    }
}

impl<S: QuoteStore> DataLoader for WindowedLoader<S> {
    fn start(&self) -> NaiveDateTime {
        self.start
    }

    fn end(&self) -> NaiveDateTime {
        self.end
    }

    fn select_filter(&self) -> &SelectFilter {
        &self.filter
    }

    fn fields(&self) -> &FieldSet {
        &self.fields
    }

    fn timestamps(&self) -> &[NaiveDateTime] {
        self.index.as_slice()
    }

    fn cache_span(&self) -> Option<CacheSpan> {
        self.cache.as_ref().map(CacheBlock::span)
    }

    fn load_cache(&mut self, from_timestamp: NaiveDateTime) -> Result<()> {
        let position = self.index.position(from_timestamp)?;
        let block_end = self
            .index
            .block_end(position, self.block_size)
            .ok_or_else(|| Error::not_found(from_timestamp))?;

        let query = Query::option_window(&self.selection, &self.fields, from_timestamp, block_end);
        let rows = self.store.fetch(&query)?;
        debug!(
            start = %from_timestamp,
            end = %block_end,
            rows = rows.len(),
            "loaded cache block"
        );

        self.cache = Some(CacheBlock::new(
            CacheSpan::new(from_timestamp, block_end),
            rows,
        ));
        Ok(())
    }

    fn get_next_option_chain(&mut self, timestamp: NaiveDateTime) -> Result<Vec<OptionRecord>> {
        if timestamp < self.start || timestamp > self.end {
            return Err(Error::OutOfRange {
                timestamp,
                start: self.start,
                end: self.end,
            });
        }
        if !self.index.contains(timestamp) {
            return Err(Error::not_found(timestamp));
        }
        if !self
            .cache_span()
            .is_some_and(|span| span.contains(timestamp))
        {
            self.load_cache(timestamp)?;
        }

        let chain = self
            .cache
            .as_ref()
            .map(|block| assemble_chain(block.rows_at(timestamp), &self.fields))
            .unwrap_or_default();
        trace!(%timestamp, options = chain.len(), "assembled option chain");

        if let Some(subscriber) = self.subscriber.as_mut() {
            subscriber.on_chain(timestamp, &chain)?;
        }
        Ok(chain)
    }

    fn bind(&mut self, subscriber: Box<dyn ChainSubscriber>) {
        self.subscriber = Some(subscriber);
    }
}

impl<S: fmt::Debug> fmt::Debug for WindowedLoader<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowedLoader")
            .field("store", &self.store)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("filter", &self.filter)
            .field("fields", &self.fields)
            .field("block_size", &self.block_size)
            .field("timestamps", &self.index.len())
            .field("cache_span", &self.cache.as_ref().map(CacheBlock::span))
            .field("subscribed", &self.subscriber.is_some())
            .finish()
    }
}
