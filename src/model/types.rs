//! Quote schema vocabulary.
//!
//! This module provides [`OptionType`], the [`QuoteField`] names of the quote
//! schema and [`FieldSet`], the caller's requested subset of observation fields.

use crate::error::{Error, Result};
use optionstratlib::OptionStyle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionType {
    /// Call option.
    #[serde(alias = "C", alias = "call")]
    Call,
    /// Put option.
    #[serde(alias = "P", alias = "put")]
    Put,
}

impl OptionType {
    /// Returns the integer code used by quote stores (1 = call, 2 = put).
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Call => 1,
            Self::Put => 2,
        }
    }

    /// Decodes a store integer code.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Call),
            2 => Some(Self::Put),
            _ => None,
        }
    }

    /// Returns the canonical name (`CALL` or `PUT`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = Error;

    /// Parses `CALL`/`PUT`, `C`/`P` or the integer codes `1`/`2`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C" | "CALL" | "1" => Ok(Self::Call),
            "P" | "PUT" | "2" => Ok(Self::Put),
            other => Err(Error::invalid_row(format!("invalid option type: {other:?}"))),
        }
    }
}

impl From<OptionType> for OptionStyle {
    fn from(option_type: OptionType) -> Self {
        match option_type {
            OptionType::Call => OptionStyle::Call,
            OptionType::Put => OptionStyle::Put,
        }
    }
}

impl From<OptionStyle> for OptionType {
    fn from(style: OptionStyle) -> Self {
        match style {
            OptionStyle::Call => OptionType::Call,
            OptionStyle::Put => OptionType::Put,
        }
    }
}

/// Value kind of a quote field, used to validate filters and decode rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text (`option_id`, `symbol`).
    Text,
    /// Call/put discriminator.
    OptionType,
    /// Calendar date.
    Date,
    /// Observation timestamp.
    DateTime,
    /// Decimal number.
    Number,
}

/// A column of the quote schema.
///
/// The declaration order is the canonical projection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteField {
    /// Opaque store key of the option contract.
    OptionId,
    /// Underlying symbol.
    Symbol,
    /// Expiration date.
    Expiration,
    /// Strike price.
    Strike,
    /// Call or put.
    OptionType,
    /// Observation timestamp.
    QuoteDatetime,
    /// Underlying price at the observation.
    SpotPrice,
    /// Bid price.
    Bid,
    /// Ask price.
    Ask,
    /// Reference (mid or last) price.
    Price,
    /// Delta.
    Delta,
    /// Gamma.
    Gamma,
    /// Theta.
    Theta,
    /// Vega.
    Vega,
    /// Rho.
    Rho,
    /// Open interest.
    OpenInterest,
    /// Implied volatility.
    ImpliedVolatility,
}

impl QuoteField {
    /// All fields in canonical order.
    pub const ALL: [Self; 17] = [
        Self::OptionId,
        Self::Symbol,
        Self::Expiration,
        Self::Strike,
        Self::OptionType,
        Self::QuoteDatetime,
        Self::SpotPrice,
        Self::Bid,
        Self::Ask,
        Self::Price,
        Self::Delta,
        Self::Gamma,
        Self::Theta,
        Self::Vega,
        Self::Rho,
        Self::OpenInterest,
        Self::ImpliedVolatility,
    ];

    /// Fields every retrieval request returns regardless of the requested list.
    pub const IDENTITY: [Self; 6] = [
        Self::OptionId,
        Self::Symbol,
        Self::Expiration,
        Self::Strike,
        Self::OptionType,
        Self::QuoteDatetime,
    ];

    /// Returns the schema name of the field.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::OptionId => "option_id",
            Self::Symbol => "symbol",
            Self::Expiration => "expiration",
            Self::Strike => "strike",
            Self::OptionType => "option_type",
            Self::QuoteDatetime => "quote_datetime",
            Self::SpotPrice => "spot_price",
            Self::Bid => "bid",
            Self::Ask => "ask",
            Self::Price => "price",
            Self::Delta => "delta",
            Self::Gamma => "gamma",
            Self::Theta => "theta",
            Self::Vega => "vega",
            Self::Rho => "rho",
            Self::OpenInterest => "open_interest",
            Self::ImpliedVolatility => "implied_volatility",
        }
    }

    /// Returns the value kind of the field.
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::OptionId | Self::Symbol => FieldKind::Text,
            Self::OptionType => FieldKind::OptionType,
            Self::Expiration => FieldKind::Date,
            Self::QuoteDatetime => FieldKind::DateTime,
            _ => FieldKind::Number,
        }
    }

    /// Returns true if a `<field>_range` filter may target this field.
    #[must_use]
    pub const fn is_range_capable(self) -> bool {
        matches!(self.kind(), FieldKind::Date | FieldKind::Number)
    }

    /// Returns true for fields populated only on request.
    ///
    /// `quote_datetime` is both an identity column (every row carries it) and
    /// an observation field of the record.
    #[must_use]
    pub const fn is_observation(self) -> bool {
        !matches!(
            self,
            Self::OptionId | Self::Symbol | Self::Expiration | Self::Strike | Self::OptionType
        )
    }
}

impl fmt::Display for QuoteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QuoteField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.name() == s)
            .ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

/// The caller's requested set of fields.
///
/// Determines both the query projection and which observation fields are
/// populated on assembled records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet {
    fields: BTreeSet<QuoteField>,
}

impl FieldSet {
    /// Creates a field set from typed fields.
    #[must_use]
    pub fn new(fields: impl IntoIterator<Item = QuoteField>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// Creates a field set from schema names.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownField` for a name outside the quote schema.
    pub fn parse<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = names
            .into_iter()
            .map(|name| name.as_ref().parse::<QuoteField>())
            .collect::<Result<BTreeSet<_>>>()?;
        Ok(Self { fields })
    }

    /// A field set requesting every observation field.
    #[must_use]
    pub fn all() -> Self {
        Self::new(QuoteField::ALL)
    }

    /// Returns true if the field was requested.
    #[must_use]
    pub fn contains(&self, field: QuoteField) -> bool {
        self.fields.contains(&field)
    }

    /// Returns the number of requested fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the requested fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = QuoteField> + '_ {
        self.fields.iter().copied()
    }

    /// Returns the projection of a retrieval request: the requested fields
    /// plus the identity fields, in canonical order.
    #[must_use]
    pub fn projection(&self) -> Vec<QuoteField> {
        let mut columns: BTreeSet<QuoteField> = self.fields.clone();
        columns.extend(QuoteField::IDENTITY);
        columns.into_iter().collect()
    }
}

impl FromIterator<QuoteField> for FieldSet {
    fn from_iter<T: IntoIterator<Item = QuoteField>>(iter: T) -> Self {
        Self::new(iter)
    }
}
