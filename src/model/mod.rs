//! Data model exchanged across the loader boundary.
//!
//! ## Components
//!
//! - [`SelectFilter`]: Declarative filter (symbol, option type, `<field>_range` bounds)
//! - [`RangeFilter`]: Inclusive low/high bound on one numeric or date field
//! - [`OptionRecord`]: Immutable option quote snapshot delivered in a chain
//! - [`QuoteRow`]: Decoded store row, the assembler's input
//! - [`QuoteField`] / [`FieldSet`]: Schema field names and the requested subset
//! - [`OptionType`]: Call or put

mod filter;
mod record;
mod row;
mod types;

pub use filter::{FilterValue, RANGE_SUFFIX, RangeFilter, SelectFilter};
pub use record::OptionRecord;
pub use row::QuoteRow;
pub use types::{FieldKind, FieldSet, OptionType, QuoteField};
