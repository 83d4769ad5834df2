//! Error types for the option chain loader.
//!
//! All fallible operations in this crate return [`Result<T>`], an alias over
//! the single [`Error`] enum. Store-specific failures (`rusqlite`, `csv`,
//! `std::io`) are folded into [`Error::StoreConnection`] so that callers only
//! need to distinguish the kinds of failure, never the backend that raised them.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or driving a data loader.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested start of the loader range lies after its end.
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange {
        /// Requested start of the range.
        start: NaiveDateTime,
        /// Requested end of the range.
        end: NaiveDateTime,
    },

    /// The timestamp has no entry in the precomputed timestamp index.
    #[error("timestamp not found in index: {0}")]
    NotFound(NaiveDateTime),

    /// The timestamp lies outside the loader's `[start, end]` bounds.
    #[error("timestamp {timestamp} is outside the loader range [{start}, {end}]")]
    OutOfRange {
        /// Requested timestamp.
        timestamp: NaiveDateTime,
        /// Start of the loader range.
        start: NaiveDateTime,
        /// End of the loader range.
        end: NaiveDateTime,
    },

    /// The backing store could not be opened, queried or read.
    #[error("store error: {message}")]
    StoreConnection {
        /// Description of the failure reported by the store.
        message: String,
    },

    /// A field name is not part of the quote schema.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The select filter is malformed.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// A row returned by the store could not be decoded.
    #[error("invalid row: {0}")]
    InvalidRow(String),

    /// The loader configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The bound subscriber failed to handle a chain.
    #[error("subscriber error: {0}")]
    Subscriber(String),
}

impl Error {
    /// Creates a `NotFound` error for a timestamp missing from the index.
    #[must_use]
    pub fn not_found(timestamp: NaiveDateTime) -> Self {
        Self::NotFound(timestamp)
    }

    /// Creates a `StoreConnection` error.
    #[must_use]
    pub fn store(message: impl Into<String>) -> Self {
        Self::StoreConnection {
            message: message.into(),
        }
    }

    /// Creates an `InvalidFilter` error.
    #[must_use]
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self::InvalidFilter(message.into())
    }

    /// Creates an `InvalidRow` error.
    #[must_use]
    pub fn invalid_row(message: impl Into<String>) -> Self {
        Self::InvalidRow(message.into())
    }

    /// Creates a `Config` error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a `Subscriber` error.
    #[must_use]
    pub fn subscriber(message: impl Into<String>) -> Self {
        Self::Subscriber(message.into())
    }

    /// Returns true if the error originated in the backing store.
    #[must_use]
    pub const fn is_store_error(&self) -> bool {
        matches!(self, Self::StoreConnection { .. })
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::store(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::store(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::store(err.to_string())
    }
}
