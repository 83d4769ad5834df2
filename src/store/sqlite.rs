//! SQLite-backed quote store.
//!
//! Expected table layout (column names configurable through [`ColumnMapping`]):
//!
//! | Column | Type | Notes |
//! |--------|------|-------|
//! | `option_id` | INTEGER or TEXT | opaque contract key |
//! | `symbol` | TEXT | underlying |
//! | `expiration` | TEXT | `YYYY-MM-DD`, or a timestamp whose date is used |
//! | `strike` | REAL | numeric text accepted |
//! | `option_type` | INTEGER | 1 = call, 2 = put; `C`/`P`/`CALL`/`PUT` text accepted |
//! | `quote_datetime` | TEXT | `YYYY-MM-DD HH:MM:SS[.fff]`, `T` separator or epoch seconds |
//! | observation columns | REAL / INTEGER | nullable |

use super::traits::QuoteStore;
use crate::config::{ColumnMapping, DEFAULT_TABLE, LoaderConfig};
use crate::error::{Error, Result};
use crate::model::{FieldKind, OptionType, QuoteField, QuoteRow};
use crate::query::Literal;
use crate::query::Query;
use crate::query::sql::compile;
use crate::utils::is_plain_identifier;
use chrono::{DateTime, NaiveDateTime};
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, Row, params_from_iter};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Quote store reading a SQLite database.
///
/// A read-only connection is opened for each query and closed before the
/// call returns.
#[derive(Debug, Clone)]
pub struct SqliteQuoteStore {
    path: PathBuf,
    table: String,
    columns: ColumnMapping,
}

impl SqliteQuoteStore {
    /// Creates a store over the default table with default column names.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: DEFAULT_TABLE.to_string(),
            columns: ColumnMapping::new(),
        }
    }

    /// Creates a store with an explicit table and column mapping.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a table or column name is not a plain
    /// identifier.
    pub fn with_schema(
        path: impl Into<PathBuf>,
        table: impl Into<String>,
        columns: ColumnMapping,
    ) -> Result<Self> {
        let table = table.into();
        if !is_plain_identifier(&table) {
            return Err(Error::config(format!(
                "table {table:?} is not a plain identifier"
            )));
        }
        columns.validate()?;
        Ok(Self {
            path: path.into(),
            table,
            columns,
        })
    }

    /// Creates a store from a loader configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid.
    pub fn from_config(config: &LoaderConfig) -> Result<Self> {
        Self::with_schema(&config.source, &config.table, config.columns.clone())
    }

    /// Returns the database path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Connection> {
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| Error::store(format!("cannot open {}: {e}", self.path.display())))
    }

    fn run<T>(&self, query: &Query, decode: impl Fn(&Row<'_>) -> Result<T>) -> Result<Vec<T>> {
        let compiled = compile(query, &self.table, &self.columns);
        trace!(sql = %compiled.sql, params = compiled.params.len(), "executing quote query");

        let connection = self.open()?;
        let mut statement = connection.prepare(&compiled.sql)?;
        let mut rows = statement.query(params_from_iter(compiled.params.iter()))?;
        let mut decoded = Vec::new();
        while let Some(row) = rows.next()? {
            decoded.push(decode(row)?);
        }
        Ok(decoded)
    }
}

impl QuoteStore for SqliteQuoteStore {
    fn distinct_timestamps(&self, query: &Query) -> Result<Vec<NaiveDateTime>> {
        self.run(query, |row| {
            match decode_value(QuoteField::QuoteDatetime, row.get(0)?)? {
                Some(Literal::DateTime(timestamp)) => Ok(timestamp),
                other => Err(Error::invalid_row(format!(
                    "invalid quote timestamp: {other:?}"
                ))),
            }
        })
    }

    fn fetch(&self, query: &Query) -> Result<Vec<QuoteRow>> {
        let columns = query.columns();
        self.run(query, |row| {
            let mut values = Vec::with_capacity(columns.len());
            for (idx, field) in columns.iter().enumerate() {
                if let Some(literal) = decode_value(*field, row.get(idx)?)? {
                    values.push((*field, literal));
                }
            }
            QuoteRow::from_values(values)
        })
    }
}

fn decode_value(field: QuoteField, value: Value) -> Result<Option<Literal>> {
    let literal = match (field.kind(), value) {
        (_, Value::Null) => return Ok(None),
        (kind, Value::Text(text)) => Literal::parse(kind, &text)?,
        (FieldKind::Text, Value::Integer(id)) => Literal::Text(id.to_string()),
        (FieldKind::OptionType, Value::Integer(code)) => Literal::OptionType(
            OptionType::from_code(code)
                .ok_or_else(|| Error::invalid_row(format!("invalid option type code {code}")))?,
        ),
        (FieldKind::Number, Value::Integer(number)) => Literal::Number(Decimal::from(number)),
        (FieldKind::Number, Value::Real(number)) => Literal::Number(
            Decimal::from_f64(number)
                .ok_or_else(|| Error::invalid_row(format!("invalid number {number}")))?,
        ),
        (FieldKind::DateTime, Value::Integer(seconds)) => Literal::DateTime(
            DateTime::from_timestamp(seconds, 0)
                .map(|dt| dt.naive_utc())
                .ok_or_else(|| Error::invalid_row(format!("invalid epoch {seconds}")))?,
        ),
        (_, other) => {
            return Err(Error::invalid_row(format!(
                "unexpected value {other:?} in column {field}"
            )));
        }
    };
    Ok(Some(literal))
}
