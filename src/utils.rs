//! Utility functions for the option chain loader.
//!
//! Stores exchange dates and timestamps as ISO-8601 text. These helpers are
//! the single place where that text form is produced and parsed.

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATETIME_MILLIS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Formats a date as store text (`YYYY-MM-DD`).
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use option_chain_loader::utils::format_store_date;
///
/// let date = NaiveDate::from_ymd_opt(2020, 1, 17).unwrap();
/// assert_eq!(format_store_date(date), "2020-01-17");
/// ```
#[must_use]
pub fn format_store_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats a timestamp as store text (`YYYY-MM-DD HH:MM:SS`).
#[must_use]
pub fn format_store_datetime(datetime: NaiveDateTime) -> String {
    datetime.format(DATETIME_FORMAT).to_string()
}

/// Formats a timestamp with millisecond precision (`YYYY-MM-DD HH:MM:SS.SSS`),
/// the form SQLite's `strftime('%Y-%m-%d %H:%M:%f', ...)` produces.
#[must_use]
pub fn format_store_datetime_millis(datetime: NaiveDateTime) -> String {
    datetime.format(DATETIME_MILLIS_FORMAT).to_string()
}

/// Parses store text into a date.
///
/// Accepts a bare date as well as a timestamp, in which case the time part
/// is dropped.
///
/// # Errors
///
/// Returns `Error::InvalidRow` if the text is neither form.
pub fn parse_store_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return Ok(date);
    }
    parse_store_datetime(text)
        .map(|dt| dt.date())
        .map_err(|_| Error::invalid_row(format!("invalid date: {text:?}")))
}

/// Parses store text into a timestamp.
///
/// Accepts a space or `T` separator and optional fractional seconds.
///
/// # Errors
///
/// Returns `Error::InvalidRow` if the text is not a timestamp.
pub fn parse_store_datetime(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .ok_or_else(|| Error::invalid_row(format!("invalid timestamp: {text:?}")))
}

/// Parses store text into a decimal, accepting scientific notation.
///
/// # Errors
///
/// Returns `Error::InvalidRow` if the text is not a number.
pub fn parse_decimal(text: &str) -> Result<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| Error::invalid_row(format!("invalid number: {text:?}")))
}

/// Returns true if `name` is a plain SQL identifier (`[A-Za-z_][A-Za-z0-9_]*`).
#[must_use]
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
