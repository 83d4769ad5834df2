//! Flat-file quote store.
//!
//! Reads a CSV file with a header row. Columns are located by header name
//! through the [`ColumnMapping`]; extra columns are ignored and empty cells
//! decode as missing values. The file is streamed once per query and only
//! matching rows are decoded and kept.

use super::memory::{select_rows, select_timestamps};
use super::traits::QuoteStore;
use crate::config::{ColumnMapping, LoaderConfig};
use crate::error::{Error, Result};
use crate::model::{QuoteField, QuoteRow};
use crate::query::{Literal, Predicate, Query};
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Quote store reading a CSV file.
#[derive(Debug, Clone)]
pub struct CsvQuoteStore {
    path: PathBuf,
    columns: ColumnMapping,
}

impl CsvQuoteStore {
    /// Creates a store over `path` with default column names.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            columns: ColumnMapping::new(),
        }
    }

    /// Sets the header names used to locate each field.
    #[must_use]
    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    /// Creates a store from a loader configuration.
    #[must_use]
    pub fn from_config(config: &LoaderConfig) -> Self {
        Self::new(&config.source).with_columns(config.columns.clone())
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Streams the rows that can match the query, decoding
    /// `identity ∪ projection ∪ filter` columns.
    ///
    /// The symbol and `quote_datetime` predicates are checked on their own
    /// cells first; records failing them are skipped without decoding the
    /// rest, so a malformed row elsewhere in the file does not fail the query.
    fn rows(&self, query: &Query) -> Result<impl Iterator<Item = Result<QuoteRow>>> {
        let mut fields = QuoteField::IDENTITY.to_vec();
        fields.extend(query.columns());
        fields.extend(query.filter().fields());
        fields.sort();
        fields.dedup();

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_path(&self.path)
            .map_err(|e| Error::store(format!("cannot open {}: {e}", self.path.display())))?;
        let headers = reader.headers()?.clone();
        let positions = fields
            .iter()
            .map(|field| Ok((*field, self.locate(&headers, *field)?)))
            .collect::<Result<Vec<_>>>()?;
        let screens = query
            .filter()
            .predicates()
            .iter()
            .filter(|p| matches!(p.field(), QuoteField::Symbol | QuoteField::QuoteDatetime))
            .map(|p| Ok((p.clone(), self.locate(&headers, p.field())?)))
            .collect::<Result<Vec<_>>>()?;
        trace!(
            path = %self.path.display(),
            columns = positions.len(),
            screens = screens.len(),
            "scanning quote file"
        );

        Ok(reader.into_records().filter_map(move |record| {
            let record = match record {
                Ok(record) => record,
                Err(e) => return Some(Err(e.into())),
            };
            match passes_screens(&record, &screens) {
                Ok(true) => Some(decode_record(&record, &positions)),
                Ok(false) => None,
                Err(e) => Some(Err(e)),
            }
        }))
    }

    fn locate(&self, headers: &StringRecord, field: QuoteField) -> Result<usize> {
        let name = self.columns.column(field);
        headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| {
                Error::store(format!(
                    "column {name:?} not found in {}",
                    self.path.display()
                ))
            })
    }
}

fn cell(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).filter(|text| !text.is_empty())
}

fn passes_screens(record: &StringRecord, screens: &[(Predicate, usize)]) -> Result<bool> {
    for (predicate, idx) in screens {
        let value = cell(record, *idx)
            .map(|text| Literal::parse(predicate.field().kind(), text))
            .transpose()?;
        if !predicate.matches_value(value.as_ref()) {
            return Ok(false);
        }
    }
    Ok(true)
}

fn decode_record(record: &StringRecord, positions: &[(QuoteField, usize)]) -> Result<QuoteRow> {
    let mut values = Vec::with_capacity(positions.len());
    for (field, idx) in positions {
        if let Some(text) = cell(record, *idx) {
            values.push((*field, Literal::parse(field.kind(), text)?));
        }
    }
    QuoteRow::from_values(values)
}

impl QuoteStore for CsvQuoteStore {
    fn distinct_timestamps(&self, query: &Query) -> Result<Vec<NaiveDateTime>> {
        select_timestamps(self.rows(query)?, query)
    }

    fn fetch(&self, query: &Query) -> Result<Vec<QuoteRow>> {
        select_rows(self.rows(query)?, query)
    }
}
