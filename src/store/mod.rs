//! Quote store adapters.
//!
//! A loader talks to its backing store only through the [`QuoteStore`] trait,
//! so the windowed caching logic is shared by every store technology.
//!
//! ## Components
//!
//! - [`SqliteQuoteStore`]: compiles queries into parameterized SQLite
//!   statements and opens a read-only connection per call.
//! - [`CsvQuoteStore`]: streams a flat file with a header row and evaluates
//!   the predicate tree in memory.
//! - [`MemoryQuoteStore`]: rows held in a vector, used by tests and
//!   benchmarks.

mod file;
mod memory;
mod sqlite;
mod traits;

pub use file::CsvQuoteStore;
pub use memory::MemoryQuoteStore;
pub use sqlite::SqliteQuoteStore;
pub use traits::QuoteStore;
