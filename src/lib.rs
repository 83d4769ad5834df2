//! # Option Chain Loader - Windowed Historical Option Data for Backtesting
//!
//! A Rust library that replays historical option chains, one observation
//! timestamp at a time, from a SQL database or a flat file. It is the data
//! feed of an options backtest: a strategy subscribes to the loader and
//! receives the full chain (every contract matching its filter) at each
//! instant, while the loader keeps only a bounded block of quotes in memory.
//!
//! ## Key Features
//!
//! - **Bounded Memory**: A single cache block covers a contiguous run of
//!   timestamps; requests inside it are served from memory, requests outside
//!   it replace it.
//!
//! - **Declarative Filters**: [`model::SelectFilter`] combines a symbol, an
//!   optional call/put restriction and inclusive `<field>_range` bounds on
//!   any numeric or date field.
//!
//! - **Field-Presence Guarantee**: Records expose only the fields the caller
//!   requested, whatever the store holds.
//!
//! - **Pluggable Stores**: SQLite and CSV adapters share one windowed loader
//!   through the [`store::QuoteStore`] trait.
//!
//! - **Parameterized SQL**: Filters compile to a typed predicate tree and
//!   then to bound statement parameters; values never reach the SQL text.
//!
//! - **OptionStratLib Integration**: Option types convert to and from
//!   `optionstratlib::OptionStyle`.
//!
//! ## Architecture
//!
//! ```text
//! OptionTestManager (builds the loader from LoaderConfig, replays timestamps)
//!   └── DataLoader (contract)
//!         └── WindowedLoader<S: QuoteStore>
//!               ├── TimestampIndex (distinct timestamps for symbol and range)
//!               ├── CacheBlock (rows for [start_load, last_loaded])
//!               ├── ChainSubscriber (single bound receiver)
//!               └── QuoteStore
//!                     ├── SqliteQuoteStore (Query → parameterized SQL)
//!                     ├── CsvQuoteStore (Query evaluated in memory)
//!                     └── MemoryQuoteStore
//! ```
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`loader`] | Loader contract, windowed loader, index, cache and chain assembly |
//! | [`store`] | Backing-store trait and the SQLite, CSV and in-memory adapters |
//! | [`query`] | Store-independent query model and its SQL compilation |
//! | [`model`] | Filters, field names, decoded rows and option records |
//! | [`manager`] | Backtest driver replaying every timestamp |
//! | [`config`] | JSON loader configuration |
//! | [`error`] | Error types and `Result` type alias |
//! | [`utils`] | Store date and number formatting helpers |
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use option_chain_loader::loader::{DataLoader, WindowedLoader};
//! use option_chain_loader::model::{FieldSet, OptionType, QuoteField, QuoteRow, SelectFilter};
//! use option_chain_loader::store::MemoryQuoteStore;
//! use rust_decimal_macros::dec;
//!
//! let t = NaiveDate::from_ymd_opt(2020, 1, 2)
//!     .unwrap()
//!     .and_hms_opt(9, 31, 0)
//!     .unwrap();
//! let expiry = NaiveDate::from_ymd_opt(2020, 1, 17).unwrap();
//! let mut row = QuoteRow::new("1", "XYZ", expiry, dec!(100), OptionType::Call, t);
//! row.bid = Some(dec!(1.25));
//! row.ask = Some(dec!(1.35));
//!
//! let filter = SelectFilter::new("XYZ")?.with_strike_range(Some(dec!(90)), Some(dec!(110)));
//! let mut loader = WindowedLoader::new(
//!     MemoryQuoteStore::new(vec![row]),
//!     t,
//!     t,
//!     filter,
//!     FieldSet::new([QuoteField::Bid]),
//! )?;
//!
//! let chain = loader.get_next_option_chain(t)?;
//! assert_eq!(chain.len(), 1);
//! assert_eq!(chain[0].bid, Some(dec!(1.25)));
//! assert_eq!(chain[0].ask, None);
//! # Ok::<(), option_chain_loader::Error>(())
//! ```
//!
//! ## Demos
//!
//! ```bash
//! cargo run --example replay_chains
//! ```
//!
//! ## Benchmarks
//!
//! - **chain_bench**: chain assembly under different field lists
//! - **windowed_bench**: sequential replay with different block sizes
//!
//! ```bash
//! cargo bench
//! ```
//!
//! ## Dependencies
//!
//! - **rusqlite** (0.34): SQLite access, bundled
//! - **csv** (1.3): Flat-file reading
//! - **optionstratlib** (0.13): Option style interop
//! - **rust_decimal** (1.39): Precise decimal arithmetic
//! - **chrono** (0.4): Dates and timestamps
//! - **thiserror** (2.0): Error handling
//! - **serde** (1.0): Serialization support
//! - **tracing** (0.1): Structured logging

pub mod config;
pub mod error;
pub mod loader;
pub mod manager;
pub mod model;
pub mod query;
pub mod store;
pub mod utils;

pub use error::{Error, Result};
