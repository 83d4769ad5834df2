//! Structured predicate tree.
//!
//! A [`Conjunction`] of typed [`Predicate`]s is the store-independent form of
//! a filter. Each store adapter either compiles it into its native query
//! language or evaluates it directly against decoded rows.

use crate::error::{Error, Result};
use crate::model::{FieldKind, FilterValue, OptionType, QuoteField, QuoteRow};
use crate::utils::{parse_decimal, parse_store_date, parse_store_datetime};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// A typed value of a quote field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Text value.
    Text(String),
    /// Call/put discriminator.
    OptionType(OptionType),
    /// Calendar date.
    Date(NaiveDate),
    /// Timestamp.
    DateTime(NaiveDateTime),
    /// Decimal number.
    Number(Decimal),
}

impl Literal {
    /// Parses store text as a value of the given kind.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRow` if the text does not parse as `kind`.
    pub fn parse(kind: FieldKind, text: &str) -> Result<Self> {
        Ok(match kind {
            FieldKind::Text => Self::Text(text.to_string()),
            FieldKind::OptionType => Self::OptionType(text.parse()?),
            FieldKind::Date => Self::Date(parse_store_date(text)?),
            FieldKind::DateTime => Self::DateTime(parse_store_datetime(text)?),
            FieldKind::Number => Self::Number(parse_decimal(text)?),
        })
    }

    /// Returns the kind of the value.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::OptionType(_) => FieldKind::OptionType,
            Self::Date(_) => FieldKind::Date,
            Self::DateTime(_) => FieldKind::DateTime,
            Self::Number(_) => FieldKind::Number,
        }
    }

    /// Compares two values of the same kind; values of different kinds are
    /// incomparable.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::OptionType(a), Self::OptionType(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            (Self::Number(a), Self::Number(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<FilterValue> for Literal {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Date(date) => Self::Date(date),
            FilterValue::Number(number) => Self::Number(number),
        }
    }
}

/// One typed condition on a quote field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `field = value`.
    Equals {
        /// Constrained field.
        field: QuoteField,
        /// Required value.
        value: Literal,
    },
    /// `low <= field <= high`; an absent bound is not applied.
    Between {
        /// Constrained field.
        field: QuoteField,
        /// Inclusive lower bound.
        low: Option<Literal>,
        /// Inclusive upper bound.
        high: Option<Literal>,
    },
}

impl Predicate {
    /// Creates an exact-match predicate.
    #[must_use]
    pub const fn equals(field: QuoteField, value: Literal) -> Self {
        Self::Equals { field, value }
    }

    /// Creates an inclusive range predicate.
    #[must_use]
    pub const fn between(field: QuoteField, low: Option<Literal>, high: Option<Literal>) -> Self {
        Self::Between { field, low, high }
    }

    /// Returns the constrained field.
    #[must_use]
    pub const fn field(&self) -> QuoteField {
        match self {
            Self::Equals { field, .. } | Self::Between { field, .. } => *field,
        }
    }

    /// Returns true if the predicate constrains nothing.
    #[must_use]
    pub const fn is_trivial(&self) -> bool {
        matches!(
            self,
            Self::Between {
                low: None,
                high: None,
                ..
            }
        )
    }

    /// Evaluates the predicate against a row.
    ///
    /// A missing value never matches.
    #[must_use]
    pub fn matches(&self, row: &QuoteRow) -> bool {
        self.matches_value(row.value(self.field()).as_ref())
    }

    /// Evaluates the predicate against one value of its field.
    ///
    /// A missing value never matches.
    #[must_use]
    pub fn matches_value(&self, actual: Option<&Literal>) -> bool {
        if self.is_trivial() {
            return true;
        }
        let Some(actual) = actual else {
            return false;
        };
        match self {
            Self::Equals { value, .. } => actual.compare(value) == Some(Ordering::Equal),
            Self::Between { low, high, .. } => {
                let above_low = low.as_ref().is_none_or(|low| {
                    matches!(
                        actual.compare(low),
                        Some(Ordering::Greater | Ordering::Equal)
                    )
                });
                let below_high = high.as_ref().is_none_or(|high| {
                    matches!(actual.compare(high), Some(Ordering::Less | Ordering::Equal))
                });
                above_low && below_high
            }
        }
    }

    fn check_kinds(&self) -> Result<()> {
        let expected = self.field().kind();
        let literals: Vec<&Literal> = match self {
            Self::Equals { value, .. } => vec![value],
            Self::Between { low, high, .. } => low.iter().chain(high.iter()).collect(),
        };
        match literals.into_iter().find(|literal| literal.kind() != expected) {
            Some(literal) => Err(Error::invalid_filter(format!(
                "value {literal:?} does not match the type of field {}",
                self.field()
            ))),
            None => Ok(()),
        }
    }
}

/// A conjunction (logical AND) of predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conjunction {
    predicates: Vec<Predicate>,
}

impl Conjunction {
    /// Creates an empty conjunction, which matches every row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Builds a conjunction from predicates constructed with matching kinds.
    pub(crate) fn from_trusted(predicates: Vec<Predicate>) -> Self {
        Self {
            predicates: predicates.into_iter().filter(|p| !p.is_trivial()).collect(),
        }
    }

    /// Appends a predicate; trivial predicates are dropped.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidFilter` if a value's kind does not match its field.
    pub fn push(&mut self, predicate: Predicate) -> Result<()> {
        predicate.check_kinds()?;
        if !predicate.is_trivial() {
            self.predicates.push(predicate);
        }
        Ok(())
    }

    /// Returns the predicates in order.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Returns the distinct fields referenced by the predicates.
    #[must_use]
    pub fn fields(&self) -> Vec<QuoteField> {
        let mut fields: Vec<QuoteField> = self.predicates.iter().map(Predicate::field).collect();
        fields.sort_unstable();
        fields.dedup();
        fields
    }

    /// Evaluates every predicate against a row.
    #[must_use]
    pub fn matches(&self, row: &QuoteRow) -> bool {
        self.predicates.iter().all(|p| p.matches(row))
    }
}
