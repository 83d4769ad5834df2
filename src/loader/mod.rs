//! Windowed option chain loading.
//!
//! ## Components
//!
//! - [`DataLoader`]: the contract shared by every loader: range, filter,
//!   field list, timestamp index, cache control and chain retrieval.
//! - [`WindowedLoader`]: block-cached implementation generic over a
//!   [`QuoteStore`](crate::store::QuoteStore), with the [`SqlDataLoader`] and
//!   [`FileDataLoader`] aliases.
//! - [`ChainSubscriber`]: synchronous receiver of each assembled chain.
//! - [`TimestampIndex`] and [`CacheBlock`]: the loader's index and its single
//!   cached block.
//! - [`assemble_chain`]: rows to [`OptionRecord`](crate::model::OptionRecord)s
//!   under the requested field list.

mod cache;
mod chain;
mod index;
mod traits;
mod windowed;

pub use cache::{CacheBlock, CacheSpan};
pub use chain::{assemble_chain, build_record};
pub use index::TimestampIndex;
pub use traits::{ChainSubscriber, DataLoader};
pub use windowed::{FileDataLoader, SqlDataLoader, WindowedLoader};
