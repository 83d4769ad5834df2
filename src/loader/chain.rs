//! Chain assembly.
//!
//! Turns the rows cached for one timestamp into [`OptionRecord`]s. Identity
//! fields are always copied; every other field is copied only when it was
//! requested, so a record never exposes data the caller did not ask for.

use crate::model::{FieldSet, OptionRecord, QuoteField, QuoteRow};

/// Builds one record from a row, honoring the requested fields.
#[must_use]
pub fn build_record(row: &QuoteRow, fields: &FieldSet) -> OptionRecord {
    let pick = |field: QuoteField, value| if fields.contains(field) { value } else { None };
    OptionRecord {
        option_id: row.option_id.clone(),
        symbol: row.symbol.clone(),
        expiration: row.expiration,
        strike: row.strike,
        option_type: row.option_type,
        quote_datetime: fields
            .contains(QuoteField::QuoteDatetime)
            .then_some(row.quote_datetime),
        spot_price: pick(QuoteField::SpotPrice, row.spot_price),
        bid: pick(QuoteField::Bid, row.bid),
        ask: pick(QuoteField::Ask, row.ask),
        price: pick(QuoteField::Price, row.price),
        delta: pick(QuoteField::Delta, row.delta),
        gamma: pick(QuoteField::Gamma, row.gamma),
        theta: pick(QuoteField::Theta, row.theta),
        vega: pick(QuoteField::Vega, row.vega),
        rho: pick(QuoteField::Rho, row.rho),
        open_interest: fields
            .contains(QuoteField::OpenInterest)
            .then_some(row.open_interest)
            .flatten(),
        implied_volatility: pick(QuoteField::ImpliedVolatility, row.implied_volatility),
    }
}

/// Builds the chain for one timestamp, preserving row order.
#[must_use]
pub fn assemble_chain(rows: &[QuoteRow], fields: &FieldSet) -> Vec<OptionRecord> {
    rows.iter().map(|row| build_record(row, fields)).collect()
}
