//! Decoded quote rows as returned by a quote store.

use super::types::{OptionType, QuoteField};
use crate::error::{Error, Result};
use crate::query::Literal;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// One row of the quote table.
///
/// Identity columns are always present. Observation columns are `None` when
/// the store holds no value or the column was not part of the projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRow {
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
    pub quote_datetime: NaiveDateTime,
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

impl QuoteRow {
    /// Creates a row with identity columns only.
    #[must_use]
    pub fn new(
        option_id: impl Into<String>,
        symbol: impl Into<String>,
        expiration: NaiveDate,
        strike: Decimal,
        option_type: OptionType,
        quote_datetime: NaiveDateTime,
    ) -> Self {
        Self {
            option_id: option_id.into(),
            symbol: symbol.into(),
            expiration,
            strike,
            option_type,
            quote_datetime,
            spot_price: None,
            bid: None,
            ask: None,
            price: None,
            delta: None,
            gamma: None,
            theta: None,
            vega: None,
            rho: None,
            open_interest: None,
            implied_volatility: None,
        }
    }

    /// Builds a row from decoded column values.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRow` if an identity column is missing or a value
    /// does not fit its column.
    pub fn from_values(values: impl IntoIterator<Item = (QuoteField, Literal)>) -> Result<Self> {
        let mut option_id = None;
        let mut symbol = None;
        let mut expiration = None;
        let mut strike = None;
        let mut option_type = None;
        let mut quote_datetime = None;
        let mut observations = Vec::new();

        for (field, value) in values {
            match (field, value) {
                (QuoteField::OptionId, Literal::Text(v)) => option_id = Some(v),
                (QuoteField::Symbol, Literal::Text(v)) => symbol = Some(v),
                (QuoteField::Expiration, Literal::Date(v)) => expiration = Some(v),
                (QuoteField::Strike, Literal::Number(v)) => strike = Some(v),
                (QuoteField::OptionType, Literal::OptionType(v)) => option_type = Some(v),
                (QuoteField::QuoteDatetime, Literal::DateTime(v)) => quote_datetime = Some(v),
                (field, Literal::Number(v)) if field.is_observation() => {
                    observations.push((field, v));
                }
                (field, value) => {
                    return Err(Error::invalid_row(format!(
                        "value {value:?} does not fit column {field}"
                    )));
                }
            }
        }

        let missing = |field: QuoteField| Error::invalid_row(format!("missing column {field}"));
        let mut row = Self::new(
            option_id.ok_or_else(|| missing(QuoteField::OptionId))?,
            symbol.ok_or_else(|| missing(QuoteField::Symbol))?,
            expiration.ok_or_else(|| missing(QuoteField::Expiration))?,
            strike.ok_or_else(|| missing(QuoteField::Strike))?,
            option_type.ok_or_else(|| missing(QuoteField::OptionType))?,
            quote_datetime.ok_or_else(|| missing(QuoteField::QuoteDatetime))?,
        );
        for (field, value) in observations {
            row.set_number(field, value)?;
        }
        Ok(row)
    }

    fn set_number(&mut self, field: QuoteField, value: Decimal) -> Result<()> {
        let slot = match field {
            QuoteField::SpotPrice => &mut self.spot_price,
            QuoteField::Bid => &mut self.bid,
            QuoteField::Ask => &mut self.ask,
            QuoteField::Price => &mut self.price,
            QuoteField::Delta => &mut self.delta,
            QuoteField::Gamma => &mut self.gamma,
            QuoteField::Theta => &mut self.theta,
            QuoteField::Vega => &mut self.vega,
            QuoteField::Rho => &mut self.rho,
            QuoteField::ImpliedVolatility => &mut self.implied_volatility,
            QuoteField::OpenInterest => {
                let count = if value.fract().is_zero() {
                    value.to_u64()
                } else {
                    None
                };
                let count = count.ok_or_else(|| {
                    Error::invalid_row(format!("invalid open interest: {value}"))
                })?;
                self.open_interest = Some(count);
                return Ok(());
            }
            other => {
                return Err(Error::invalid_row(format!("column {other} is not numeric")));
            }
        };
        *slot = Some(value);
        Ok(())
    }

    /// Returns the value of a column as a typed literal.
    #[must_use]
    pub fn value(&self, field: QuoteField) -> Option<Literal> {
        let number = |v: Option<Decimal>| v.map(Literal::Number);
        match field {
            QuoteField::OptionId => Some(Literal::Text(self.option_id.clone())),
            QuoteField::Symbol => Some(Literal::Text(self.symbol.clone())),
            QuoteField::Expiration => Some(Literal::Date(self.expiration)),
            QuoteField::Strike => Some(Literal::Number(self.strike)),
            QuoteField::OptionType => Some(Literal::OptionType(self.option_type)),
            QuoteField::QuoteDatetime => Some(Literal::DateTime(self.quote_datetime)),
            QuoteField::SpotPrice => number(self.spot_price),
            QuoteField::Bid => number(self.bid),
            QuoteField::Ask => number(self.ask),
            QuoteField::Price => number(self.price),
            QuoteField::Delta => number(self.delta),
            QuoteField::Gamma => number(self.gamma),
            QuoteField::Theta => number(self.theta),
            QuoteField::Vega => number(self.vega),
            QuoteField::Rho => number(self.rho),
            QuoteField::OpenInterest => self.open_interest.map(|v| Literal::Number(v.into())),
            QuoteField::ImpliedVolatility => number(self.implied_volatility),
        }
    }

    /// Clears every observation column not listed in `columns`.
    pub fn retain_columns(&mut self, columns: &[QuoteField]) {
        let keep = |field: QuoteField| columns.contains(&field);
        if !keep(QuoteField::SpotPrice) {
            self.spot_price = None;
        }
        if !keep(QuoteField::Bid) {
            self.bid = None;
        }
        if !keep(QuoteField::Ask) {
            self.ask = None;
        }
        if !keep(QuoteField::Price) {
            self.price = None;
        }
        if !keep(QuoteField::Delta) {
            self.delta = None;
        }
        if !keep(QuoteField::Gamma) {
            self.gamma = None;
        }
        if !keep(QuoteField::Theta) {
            self.theta = None;
        }
        if !keep(QuoteField::Vega) {
            self.vega = None;
        }
        if !keep(QuoteField::Rho) {
            self.rho = None;
        }
        if !keep(QuoteField::OpenInterest) {
            self.open_interest = None;
        }
        if !keep(QuoteField::ImpliedVolatility) {
            self.implied_volatility = None;
        }
    }
}
