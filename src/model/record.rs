//! Option quote snapshot handed to chain subscribers.

use super::types::OptionType;
use chrono::{NaiveDate, NaiveDateTime};
use optionstratlib::OptionStyle;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Immutable snapshot of one option quote at one instant.
///
/// Identity fields are always set. Every observation field is `None` unless
/// it was part of the loader's requested field list, even when the store
/// holds a value for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRecord {
    /// Opaque store key of the option contract.
    pub option_id: String,
    /// Underlying symbol.
    pub symbol: String,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Strike price.
    pub strike: Decimal,
    /// Call or put.
    pub option_type: OptionType,
    /// Observation timestamp.
    pub quote_datetime: Option<NaiveDateTime>,
    /// Underlying price.
    pub spot_price: Option<Decimal>,
    /// Bid price.
    pub bid: Option<Decimal>,
    /// Ask price.
    pub ask: Option<Decimal>,
    /// Reference price.
    pub price: Option<Decimal>,
    /// Delta.
    pub delta: Option<Decimal>,
    /// Gamma.
    pub gamma: Option<Decimal>,
    /// Theta.
    pub theta: Option<Decimal>,
    /// Vega.
    pub vega: Option<Decimal>,
    /// Rho.
    pub rho: Option<Decimal>,
    /// Open interest.
    pub open_interest: Option<u64>,
    /// Implied volatility.
    pub implied_volatility: Option<Decimal>,
}

impl OptionRecord {
    /// Returns the option style used by the pricing library.
    #[must_use]
    pub fn option_style(&self) -> OptionStyle {
        self.option_type.into()
    }

    /// Returns the midpoint of bid and ask when both were loaded.
    #[must_use]
    pub fn mid(&self) -> Option<Decimal> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }
}
