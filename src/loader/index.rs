//! Sorted index of observation timestamps.

use crate::error::{Error, Result};
use chrono::NaiveDateTime;

/// Distinct observation timestamps in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimestampIndex {
    timestamps: Vec<NaiveDateTime>,
}

impl TimestampIndex {
    /// Builds an index, sorting and removing duplicates.
    #[must_use]
    pub fn new(mut timestamps: Vec<NaiveDateTime>) -> Self {
        timestamps.sort_unstable();
        timestamps.dedup();
        Self { timestamps }
    }

    /// Returns the position of `timestamp` (exact match).
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the timestamp is not indexed.
    pub fn position(&self, timestamp: NaiveDateTime) -> Result<usize> {
        self.timestamps
            .binary_search(&timestamp)
            .map_err(|_| Error::not_found(timestamp))
    }

    /// Returns the last timestamp of the block starting at `position`: the
    /// entry `block_size` positions later, clamped to the last entry.
    #[must_use]
    pub fn block_end(&self, position: usize, block_size: usize) -> Option<NaiveDateTime> {
        let last = self.timestamps.len().checked_sub(1)?;
        if position > last {
            return None;
        }
        Some(self.timestamps[position.saturating_add(block_size).min(last)])
    }

    /// Returns true if `timestamp` is indexed.
    #[must_use]
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.timestamps.binary_search(&timestamp).is_ok()
    }

    /// Returns the timestamps.
    #[must_use]
    pub fn as_slice(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Returns the number of timestamps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Returns true if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}
