//! Backtest driver.
//!
//! [`OptionTestManager`] builds the loader named by a [`LoaderConfig`], binds
//! the strategy's subscriber and replays every indexed timestamp in order.

use crate::config::{LoaderConfig, LoaderKind};
use crate::error::Result;
use crate::loader::{ChainSubscriber, DataLoader, FileDataLoader, SqlDataLoader};
use crate::model::{FieldSet, SelectFilter};
use crate::store::{CsvQuoteStore, SqliteQuoteStore};
use chrono::NaiveDateTime;
use tracing::{debug, info};

/// Owns a configured loader and replays its chains.
pub struct OptionTestManager {
    loader: Box<dyn DataLoader>,
}

impl OptionTestManager {
    /// Builds the loader selected by `config` and binds `subscriber` to it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for an invalid configuration, or any error
    /// raised while constructing the loader.
    pub fn new(
        config: &LoaderConfig,
        start: NaiveDateTime,
        end: NaiveDateTime,
        filter: SelectFilter,
        fields: FieldSet,
        subscriber: Box<dyn ChainSubscriber>,
    ) -> Result<Self> {
        config.validate()?;
        let mut loader: Box<dyn DataLoader> = match config.kind {
            LoaderKind::Sql => Box::new(
                SqlDataLoader::new(
                    SqliteQuoteStore::from_config(config)?,
                    start,
                    end,
                    filter,
                    fields,
                )?
                .with_block_size(config.block_size),
            ),
            LoaderKind::File => Box::new(
                FileDataLoader::new(CsvQuoteStore::from_config(config), start, end, filter, fields)?
                    .with_block_size(config.block_size),
            ),
        };
        loader.bind(subscriber);
        debug!(kind = ?config.kind, source = %config.source.display(), "created data loader");
        Ok(Self { loader })
    }

    /// Wraps an already configured loader.
    #[must_use]
    pub fn from_loader(loader: Box<dyn DataLoader>) -> Self {
        Self { loader }
    }

    /// Returns the loader.
    #[must_use]
    pub fn loader(&self) -> &dyn DataLoader {
        self.loader.as_ref()
    }

    /// Returns the loader mutably.
    pub fn loader_mut(&mut self) -> &mut dyn DataLoader {
        self.loader.as_mut()
    }

    /// Publishes the chain of every indexed timestamp, in order.
    ///
    /// Returns the number of chains published.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first store or subscriber error.
    pub fn run(&mut self) -> Result<usize> {
        let timestamps = self.loader.timestamps().to_vec();
        info!(
            symbol = self.loader.select_filter().symbol(),
            timestamps = timestamps.len(),
            "replaying option chains"
        );
        for timestamp in &timestamps {
            self.loader.get_next_option_chain(*timestamp)?;
        }
        info!(chains = timestamps.len(), "replay finished");
        Ok(timestamps.len())
    }
}

impl std::fmt::Debug for OptionTestManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionTestManager")
            .field("symbol", &self.loader.select_filter().symbol())
            .field("start", &self.loader.start())
            .field("end", &self.loader.end())
            .field("timestamps", &self.loader.timestamps().len())
            .finish()
    }
}
