//! Store-independent retrieval requests.
//!
//! A [`Query`] describes what a loader needs from its store: a projection, a
//! [`Conjunction`] of typed predicates and a sort order. Two shapes exist:
//!
//! - [`Query::timestamp_index`]: distinct observation timestamps for a symbol
//!   and date range. Range filters and the option type never shrink it.
//! - [`Query::option_block`]: the requested columns for a window of
//!   timestamps, with every filter applied, sorted by timestamp, expiration
//!   and strike. A loader validates its filter once with
//!   [`Query::selection`] and builds each window with [`Query::option_window`].
//!
//! Store adapters compile a query into their native form ([`sql::compile`])
//! or evaluate it in memory ([`Conjunction::matches`]).

mod predicate;
pub mod sql;

pub use predicate::{Conjunction, Literal, Predicate};

use crate::error::Result;
use crate::model::{FieldSet, QuoteField, SelectFilter};
use chrono::NaiveDateTime;

/// Sort order of option block queries.
pub const CHAIN_ORDER: [QuoteField; 3] = [
    QuoteField::QuoteDatetime,
    QuoteField::Expiration,
    QuoteField::Strike,
];

/// Columns returned by a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// The listed columns, in order.
    Columns(Vec<QuoteField>),
    /// Distinct values of `quote_datetime`.
    DistinctTimestamps,
}

/// A filtered, sorted retrieval request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    projection: Projection,
    filter: Conjunction,
    order_by: Vec<QuoteField>,
}

impl Query {
    /// Builds the distinct-timestamp query over `symbol` and `[start, end]`.
    #[must_use]
    pub fn timestamp_index(symbol: &str, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            projection: Projection::DistinctTimestamps,
            filter: Conjunction::from_trusted(vec![
                Predicate::equals(QuoteField::Symbol, Literal::Text(symbol.to_string())),
                Predicate::between(
                    QuoteField::QuoteDatetime,
                    Some(Literal::DateTime(start)),
                    Some(Literal::DateTime(end)),
                ),
            ]),
            order_by: vec![QuoteField::QuoteDatetime],
        }
    }

    /// Builds the predicates a filter imposes on every block: the symbol, the
    /// option type and each range, in that order.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidFilter` if a range bound does not match its field.
    pub fn selection(filter: &SelectFilter) -> Result<Conjunction> {
        let mut conjunction = Conjunction::new();
        conjunction.push(Predicate::equals(
            QuoteField::Symbol,
            Literal::Text(filter.symbol().to_string()),
        ))?;
        if let Some(option_type) = filter.option_type() {
            conjunction.push(Predicate::equals(
                QuoteField::OptionType,
                Literal::OptionType(option_type),
            ))?;
        }
        for range in filter.ranges() {
            conjunction.push(Predicate::between(
                range.field(),
                range.low().map(Literal::from),
                range.high().map(Literal::from),
            ))?;
        }
        Ok(conjunction)
    }

    /// Builds the block query for the inclusive window `[start, end]` from a
    /// selection built by [`Query::selection`].
    #[must_use]
    pub fn option_window(
        selection: &Conjunction,
        fields: &FieldSet,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        let mut predicates = selection.predicates().to_vec();
        predicates.push(Predicate::between(
            QuoteField::QuoteDatetime,
            Some(Literal::DateTime(start)),
            Some(Literal::DateTime(end)),
        ));
        Self {
            projection: Projection::Columns(fields.projection()),
            filter: Conjunction::from_trusted(predicates),
            order_by: CHAIN_ORDER.to_vec(),
        }
    }

    /// Builds the block query for the inclusive window `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidFilter` if a range bound does not match its field.
    pub fn option_block(
        filter: &SelectFilter,
        fields: &FieldSet,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self> {
        Ok(Self::option_window(
            &Self::selection(filter)?,
            fields,
            start,
            end,
        ))
    }

    /// Returns the projection.
    #[must_use]
    pub const fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Returns the projected columns; a distinct-timestamp query projects
    /// `quote_datetime` only.
    #[must_use]
    pub fn columns(&self) -> Vec<QuoteField> {
        match &self.projection {
            Projection::Columns(columns) => columns.clone(),
            Projection::DistinctTimestamps => vec![QuoteField::QuoteDatetime],
        }
    }

    /// Returns the filter.
    #[must_use]
    pub const fn filter(&self) -> &Conjunction {
        &self.filter
    }

    /// Returns the sort columns, all ascending.
    #[must_use]
    pub fn order_by(&self) -> &[QuoteField] {
        &self.order_by
    }
}
