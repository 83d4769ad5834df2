//! SQLite compilation of [`Query`] values.
//!
//! Every value is bound as a numbered parameter; only table and column names,
//! validated as plain identifiers by the configuration, are written into the
//! statement text.
//!
//! Both sides of a comparison are brought to one form before SQLite compares
//! them, so every value the row decoder accepts is also matched by the
//! filter:
//!
//! - timestamps through `strftime('%Y-%m-%d %H:%M:%f', ...)`, with integer
//!   columns read as Unix epoch seconds;
//! - dates through `date(...)`, which also truncates a stored timestamp;
//! - numbers through `CAST(... AS REAL)`;
//! - the option type through its integer code, text spellings included.

use super::{Literal, Predicate, Projection, Query};
use crate::config::ColumnMapping;
use crate::model::{FieldKind, QuoteField};
use crate::utils::{format_store_date, format_store_datetime_millis};
use rusqlite::types::Value;

const SQL_DATETIME: &str = "%Y-%m-%d %H:%M:%f";

/// A parameterized SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    /// Statement text with `?N` placeholders.
    pub sql: String,
    /// Values bound to the placeholders, in order.
    pub params: Vec<Value>,
}

/// Compiles a query against `table` using the given column names.
#[must_use]
pub fn compile(query: &Query, table: &str, columns: &ColumnMapping) -> SqlQuery {
    let mut params = Vec::new();
    let mut clauses = Vec::new();

    for predicate in query.filter().predicates() {
        let column = normalized(predicate.field(), columns.column(predicate.field()));
        match predicate {
            Predicate::Equals { value, .. } => {
                clauses.push(comparison(&column, "=", value, &mut params));
            }
            Predicate::Between { low, high, .. } => {
                if let Some(low) = low {
                    clauses.push(comparison(&column, ">=", low, &mut params));
                }
                if let Some(high) = high {
                    clauses.push(comparison(&column, "<=", high, &mut params));
                }
            }
        }
    }

    // Distinct timestamps are read raw; the index sorts them once decoded.
    let (select, order) = match query.projection() {
        Projection::Columns(fields) => (
            fields
                .iter()
                .map(|field| columns.column(*field))
                .collect::<Vec<_>>()
                .join(", "),
            query
                .order_by()
                .iter()
                .map(|field| normalized(*field, columns.column(*field)))
                .collect::<Vec<_>>(),
        ),
        Projection::DistinctTimestamps => {
            let column = columns.column(QuoteField::QuoteDatetime);
            (
                format!("DISTINCT {column}"),
                query
                    .order_by()
                    .iter()
                    .map(|field| columns.column(*field).to_string())
                    .collect(),
            )
        }
    };

    let mut sql = format!("SELECT {select} FROM {table}");
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    if !order.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&order.join(", "));
    }

    SqlQuery { sql, params }
}

/// Returns the expression reading `column` in the form its literals are bound in.
fn normalized(field: QuoteField, column: &str) -> String {
    match field.kind() {
        FieldKind::Text => column.to_string(),
        FieldKind::OptionType => format!(
            "(CASE upper(trim({column})) \
             WHEN '1' THEN 1 WHEN 'C' THEN 1 WHEN 'CALL' THEN 1 \
             WHEN '2' THEN 2 WHEN 'P' THEN 2 WHEN 'PUT' THEN 2 END)"
        ),
        FieldKind::Date => format!("date({column})"),
        FieldKind::DateTime => format!(
            "(CASE typeof({column}) \
             WHEN 'integer' THEN strftime('{SQL_DATETIME}', {column}, 'unixepoch') \
             ELSE strftime('{SQL_DATETIME}', {column}) END)"
        ),
        FieldKind::Number => format!("CAST({column} AS REAL)"),
    }
}

fn comparison(column: &str, operator: &str, literal: &Literal, params: &mut Vec<Value>) -> String {
    params.push(match literal {
        Literal::Text(text) => Value::Text(text.clone()),
        Literal::OptionType(option_type) => Value::Integer(option_type.code()),
        Literal::Date(date) => Value::Text(format_store_date(*date)),
        Literal::DateTime(datetime) => Value::Text(format_store_datetime_millis(*datetime)),
        Literal::Number(number) => Value::Text(number.to_string()),
    });
    let n = params.len();
    let placeholder = match literal {
        Literal::Date(_) => format!("date(?{n})"),
        Literal::DateTime(_) => format!("strftime('{SQL_DATETIME}', ?{n})"),
        Literal::Number(_) => format!("CAST(?{n} AS REAL)"),
        Literal::Text(_) | Literal::OptionType(_) => format!("?{n}"),
    };
    format!("{column} {operator} {placeholder}")
}
