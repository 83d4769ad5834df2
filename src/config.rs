//! Loader configuration.
//!
//! [`LoaderConfig`] selects the backing store and describes where the quote
//! table lives. It deserializes from JSON:
//!
//! ```json
//! {
//!   "kind": "sql",
//!   "source": "data/spxw.sqlite",
//!   "table": "option_quotes",
//!   "block_size": 10000,
//!   "columns": { "quote_datetime": "quote_time", "implied_volatility": "iv" }
//! }
//! ```
//!
//! Column and table names are validated as plain identifiers; unmapped fields
//! use their schema name.

use crate::error::{Error, Result};
use crate::model::QuoteField;
use crate::utils::is_plain_identifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default number of timestamps fetched per cache refill beyond the first.
pub const DEFAULT_BLOCK_SIZE: usize = 10_000;

/// Default quote table name.
pub const DEFAULT_TABLE: &str = "option_quotes";

/// Backing store technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoaderKind {
    /// SQLite database.
    #[serde(alias = "SQL_DATA_LOADER")]
    Sql,
    /// Flat CSV file with a header row.
    #[serde(alias = "FILE_DATA_LOADER")]
    File,
}

/// Mapping from schema fields to store column names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    overrides: BTreeMap<QuoteField, String>,
}

impl ColumnMapping {
    /// Creates a mapping where every field uses its schema name.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `field` to the store column `column`.
    #[must_use]
    pub fn with_column(mut self, field: QuoteField, column: impl Into<String>) -> Self {
        self.overrides.insert(field, column.into());
        self
    }

    /// Returns the store column for `field`.
    #[must_use]
    pub fn column(&self, field: QuoteField) -> &str {
        self.overrides
            .get(&field)
            .map(String::as_str)
            .unwrap_or(field.name())
    }

    /// Checks that every mapped column is a plain identifier.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first invalid column.
    pub fn validate(&self) -> Result<()> {
        match self
            .overrides
            .iter()
            .find(|(_, column)| !is_plain_identifier(column))
        {
            Some((field, column)) => Err(Error::config(format!(
                "column {column:?} for field {field} is not a plain identifier"
            ))),
            None => Ok(()),
        }
    }
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

const fn default_block_size() -> usize {
    DEFAULT_BLOCK_SIZE
}

/// Configuration of a data loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    /// Backing store technology.
    pub kind: LoaderKind,
    /// Database file or CSV file.
    pub source: PathBuf,
    /// Quote table name; ignored by the file store.
    #[serde(default = "default_table")]
    pub table: String,
    /// Timestamps fetched per refill beyond the requested one.
    #[serde(default = "default_block_size")]
    pub block_size: usize,
    /// Store column names.
    #[serde(default)]
    pub columns: ColumnMapping,
}

impl LoaderConfig {
    /// Creates a configuration with default table, block size and columns.
    #[must_use]
    pub fn new(kind: LoaderKind, source: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            source: source.into(),
            table: default_table(),
            block_size: DEFAULT_BLOCK_SIZE,
            columns: ColumnMapping::new(),
        }
    }

    /// Sets the block size.
    #[must_use]
    pub const fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Sets the table name.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Sets the column mapping.
    #[must_use]
    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the JSON is malformed or fails validation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("invalid loader configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read or is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Checks block size, table and column names.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the block size is zero or a name is not a
    /// plain identifier.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(Error::config("block size must be positive"));
        }
        if !is_plain_identifier(&self.table) {
            return Err(Error::config(format!(
                "table {:?} is not a plain identifier",
                self.table
            )));
        }
        self.columns.validate()
    }
}
