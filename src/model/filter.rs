//! Declarative select filter.
//!
//! A [`SelectFilter`] names the underlying symbol, optionally restricts the
//! option type, and carries any number of inclusive [`RangeFilter`]s over the
//! numeric and date fields of the quote schema.
//!
//! In serialized form range filters are keys carrying the reserved `_range`
//! suffix:
//!
//! ```json
//! {
//!   "symbol": "SPXW",
//!   "option_type": "PUT",
//!   "strike_range": { "low": 3000, "high": 3200 },
//!   "expiration_range": { "high": "2020-02-21" }
//! }
//! ```

use super::types::{FieldKind, OptionType, QuoteField};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Suffix identifying a range filter key.
pub const RANGE_SUFFIX: &str = "_range";

/// A bound of a range filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Bound on a date field.
    Date(NaiveDate),
    /// Bound on a numeric field.
    Number(Decimal),
}

impl FilterValue {
    /// Returns the field kind this bound can be applied to.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Date(_) => FieldKind::Date,
            Self::Number(_) => FieldKind::Number,
        }
    }
}

impl From<Decimal> for FilterValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// Inclusive `low <= field <= high` constraint; either bound may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeFilter {
    field: QuoteField,
    low: Option<FilterValue>,
    high: Option<FilterValue>,
}

impl RangeFilter {
    /// Creates a range filter.
    ///
    /// `low > high` is accepted and simply matches nothing.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidFilter` if the field cannot carry a range or a
    /// bound's kind does not match the field's kind.
    pub fn new(
        field: QuoteField,
        low: Option<FilterValue>,
        high: Option<FilterValue>,
    ) -> Result<Self> {
        if !field.is_range_capable() {
            return Err(Error::invalid_filter(format!(
                "field {field} does not support range filters"
            )));
        }
        for bound in [low, high].into_iter().flatten() {
            if bound.kind() != field.kind() {
                return Err(Error::invalid_filter(format!(
                    "bound {bound:?} does not match the type of field {field}"
                )));
            }
        }
        Ok(Self { field, low, high })
    }

    /// Returns the filtered field.
    #[must_use]
    pub const fn field(&self) -> QuoteField {
        self.field
    }

    /// Returns the inclusive lower bound.
    #[must_use]
    pub const fn low(&self) -> Option<FilterValue> {
        self.low
    }

    /// Returns the inclusive upper bound.
    #[must_use]
    pub const fn high(&self) -> Option<FilterValue> {
        self.high
    }

    /// Returns true if neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.low.is_none() && self.high.is_none()
    }

    /// Returns the serialized key of this filter, e.g. `strike_range`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}{RANGE_SUFFIX}", self.field)
    }
}

/// Declarative filter applied to every retrieval request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSelectFilter", into = "RawSelectFilter")]
pub struct SelectFilter {
    symbol: String,
    option_type: Option<OptionType>,
    ranges: Vec<RangeFilter>,
}

impl SelectFilter {
    /// Creates a filter matching every quote of `symbol`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidFilter` if the symbol is empty.
    pub fn new(symbol: impl Into<String>) -> Result<Self> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(Error::invalid_filter("symbol must not be empty"));
        }
        Ok(Self {
            symbol,
            option_type: None,
            ranges: Vec::new(),
        })
    }

    /// Restricts the filter to calls or puts.
    #[must_use]
    pub fn with_option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = Some(option_type);
        self
    }

    /// Adds a range filter, replacing any previous range on the same field.
    #[must_use]
    pub fn with_range(mut self, range: RangeFilter) -> Self {
        match self.ranges.iter_mut().find(|r| r.field == range.field) {
            Some(existing) => *existing = range,
            None => self.ranges.push(range),
        }
        self
    }

    /// Adds a range filter by its serialized name, e.g. `"delta_range"`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidFilter` if the name lacks the `_range` suffix,
    /// names an unknown field, or the bounds do not fit the field.
    pub fn with_named_range(
        self,
        name: &str,
        low: Option<FilterValue>,
        high: Option<FilterValue>,
    ) -> Result<Self> {
        let field_name = name.strip_suffix(RANGE_SUFFIX).ok_or_else(|| {
            Error::invalid_filter(format!("{name:?} is not a range filter name"))
        })?;
        let field = field_name
            .parse::<QuoteField>()
            .map_err(|_| Error::invalid_filter(format!("unknown range filter {name:?}")))?;
        Ok(self.with_range(RangeFilter::new(field, low, high)?))
    }

    /// Adds an inclusive strike range.
    #[must_use]
    pub fn with_strike_range(self, low: Option<Decimal>, high: Option<Decimal>) -> Self {
        self.with_range(RangeFilter {
            field: QuoteField::Strike,
            low: low.map(FilterValue::Number),
            high: high.map(FilterValue::Number),
        })
    }

    /// Adds an inclusive expiration range.
    #[must_use]
    pub fn with_expiration_range(self, low: Option<NaiveDate>, high: Option<NaiveDate>) -> Self {
        self.with_range(RangeFilter {
            field: QuoteField::Expiration,
            low: low.map(FilterValue::Date),
            high: high.map(FilterValue::Date),
        })
    }

    /// Adds an inclusive delta range.
    #[must_use]
    pub fn with_delta_range(self, low: Option<Decimal>, high: Option<Decimal>) -> Self {
        self.with_range(RangeFilter {
            field: QuoteField::Delta,
            low: low.map(FilterValue::Number),
            high: high.map(FilterValue::Number),
        })
    }

    /// Returns the underlying symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the option type restriction, if any.
    #[must_use]
    pub const fn option_type(&self) -> Option<OptionType> {
        self.option_type
    }

    /// Returns the range filters in insertion order.
    #[must_use]
    pub fn ranges(&self) -> &[RangeFilter] {
        &self.ranges
    }

    /// Returns the range filter on `field`, if any.
    #[must_use]
    pub fn range(&self, field: QuoteField) -> Option<&RangeFilter> {
        self.ranges.iter().find(|r| r.field == field)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawRange {
    #[serde(default)]
    low: Option<FilterValue>,
    #[serde(default)]
    high: Option<FilterValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSelectFilter {
    symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    option_type: Option<OptionType>,
    #[serde(flatten)]
    ranges: BTreeMap<String, RawRange>,
}

impl TryFrom<RawSelectFilter> for SelectFilter {
    type Error = Error;

    fn try_from(raw: RawSelectFilter) -> Result<Self> {
        let mut filter = Self::new(raw.symbol)?;
        filter.option_type = raw.option_type;
        for (name, range) in raw.ranges {
            filter = filter.with_named_range(&name, range.low, range.high)?;
        }
        Ok(filter)
    }
}

impl From<SelectFilter> for RawSelectFilter {
    fn from(filter: SelectFilter) -> Self {
        let ranges = filter
            .ranges
            .iter()
            .map(|r| {
                (
                    r.key(),
                    RawRange {
                        low: r.low,
                        high: r.high,
                    },
                )
            })
            .collect();
        Self {
            symbol: filter.symbol,
            option_type: filter.option_type,
            ranges,
        }
    }
}
