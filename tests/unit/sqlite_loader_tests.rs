//! Integration tests for the SQLite-backed loader.

use crate::fixtures::{sqlite_fixture, ts};
use chrono::{NaiveDate, NaiveDateTime};
use option_chain_loader::config::ColumnMapping;
use option_chain_loader::loader::{CacheSpan, DataLoader, SqlDataLoader};
use option_chain_loader::model::{FieldSet, OptionRecord, OptionType, QuoteField, SelectFilter};
use option_chain_loader::store::SqliteQuoteStore;
use option_chain_loader::{Error, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

fn open_loader(path: &Path, filter: SelectFilter, fields: FieldSet) -> SqlDataLoader {
    SqlDataLoader::new(
        SqliteQuoteStore::new(path),
        ts(30),
        ts(40),
        filter,
        fields,
    )
    .unwrap()
}

fn xyz() -> SelectFilter {
    SelectFilter::new("XYZ").unwrap()
}

fn strikes(chain: &[OptionRecord]) -> Vec<Decimal> {
    chain.iter().map(|r| r.strike).collect()
}

fn ids(chain: &[OptionRecord]) -> Vec<&str> {
    chain.iter().map(|r| r.option_id.as_str()).collect()
}

/// Writes `values` into an `option_quotes` table whose columns carry no
/// declared type, so SQLite keeps every value in the form it was written.
fn untyped_fixture(dir: &TempDir, values: &str) -> PathBuf {
    let path = dir.path().join("untyped.db");
    let connection = Connection::open(&path).unwrap();
    connection
        .execute_batch(&format!(
            "CREATE TABLE option_quotes (
                option_id, symbol, expiration, strike, option_type, quote_datetime, bid
            );
            INSERT INTO option_quotes VALUES {values};"
        ))
        .unwrap();
    path
}

#[test]
fn test_end_to_end_block_windows() {
    let dir = TempDir::new().unwrap();
    let path = sqlite_fixture(&dir);
    let mut loader = open_loader(
        &path,
        xyz().with_option_type(OptionType::Call),
        FieldSet::new([QuoteField::Bid, QuoteField::Ask]),
    )
    .with_block_size(3);

    assert_eq!(
        loader.timestamps(),
        &[ts(31), ts(32), ts(33), ts(34), ts(35)]
    );
    assert_eq!(loader.cache_span(), None);

    let chain = loader.get_next_option_chain(ts(31)).unwrap();
    assert_eq!(loader.cache_span(), Some(CacheSpan::new(ts(31), ts(34))));
    assert_eq!(chain.len(), 4);
    assert_eq!(chain[0].bid, Some(dec!(2.5)));
    assert_eq!(chain[0].ask, Some(dec!(2.75)));

    loader.get_next_option_chain(ts(34)).unwrap();
    assert_eq!(loader.cache_span(), Some(CacheSpan::new(ts(31), ts(34))));

    loader.get_next_option_chain(ts(35)).unwrap();
    assert_eq!(loader.cache_span(), Some(CacheSpan::new(ts(35), ts(35))));
}

#[test]
fn test_chain_sorted_by_expiration_then_strike() {
    let dir = TempDir::new().unwrap();
    let path = sqlite_fixture(&dir);
    let mut loader = open_loader(
        &path,
        xyz().with_option_type(OptionType::Call),
        FieldSet::default(),
    );
    let chain = loader.get_next_option_chain(ts(32)).unwrap();
    assert_eq!(ids(&chain), vec!["1", "2", "3", "4"]);
    assert_eq!(
        chain[3].expiration,
        NaiveDate::from_ymd_opt(2020, 2, 21).unwrap()
    );
}

#[test]
fn test_strike_range_bounds_are_inclusive() {
    let dir = TempDir::new().unwrap();
    let path = sqlite_fixture(&dir);
    let filter = xyz()
        .with_option_type(OptionType::Call)
        .with_strike_range(Some(dec!(110)), Some(dec!(150)));
    let mut loader = open_loader(&path, filter, FieldSet::default());
    let chain = loader.get_next_option_chain(ts(31)).unwrap();
    assert_eq!(strikes(&chain), vec![dec!(110), dec!(120)]);

    let filter = xyz()
        .with_option_type(OptionType::Call)
        .with_strike_range(None, Some(dec!(110)));
    let mut loader = open_loader(&path, filter, FieldSet::default());
    let chain = loader.get_next_option_chain(ts(31)).unwrap();
    assert_eq!(strikes(&chain), vec![dec!(100), dec!(110), dec!(100)]);
}

#[test]
fn test_expiration_and_delta_ranges() {
    let dir = TempDir::new().unwrap();
    let path = sqlite_fixture(&dir);
    let filter = xyz()
        .with_expiration_range(None, NaiveDate::from_ymd_opt(2020, 1, 31))
        .with_delta_range(Some(dec!(0.3)), None);
    let mut loader = open_loader(&path, filter, FieldSet::new([QuoteField::Delta]));
    let chain = loader.get_next_option_chain(ts(33)).unwrap();

    assert_eq!(ids(&chain), vec!["1", "2"]);
    assert!(chain.iter().all(|r| r.delta >= Some(dec!(0.3))));
}

#[test]
fn test_expiration_range_bounds_are_inclusive() {
    let dir = TempDir::new().unwrap();
    let path = sqlite_fixture(&dir);
    let january = NaiveDate::from_ymd_opt(2020, 1, 17);
    let february = NaiveDate::from_ymd_opt(2020, 2, 21);
    let calls = || xyz().with_option_type(OptionType::Call);

    let mut loader = open_loader(
        &path,
        calls().with_expiration_range(january, january),
        FieldSet::default(),
    );
    assert_eq!(
        ids(&loader.get_next_option_chain(ts(31)).unwrap()),
        vec!["1", "2", "3"]
    );

    let mut loader = open_loader(
        &path,
        calls().with_expiration_range(february, None),
        FieldSet::default(),
    );
    assert_eq!(ids(&loader.get_next_option_chain(ts(31)).unwrap()), vec!["4"]);

    let mut loader = open_loader(
        &path,
        calls().with_expiration_range(None, february),
        FieldSet::default(),
    );
    assert_eq!(loader.get_next_option_chain(ts(31)).unwrap().len(), 4);
}

#[test]
fn test_put_filter_on_call_only_timestamp_is_empty() {
    let dir = TempDir::new().unwrap();
    let path = sqlite_fixture(&dir);
    let mut loader = open_loader(
        &path,
        xyz().with_option_type(OptionType::Put),
        FieldSet::default(),
    );
    assert_eq!(loader.timestamps().len(), 5);
    assert!(loader.get_next_option_chain(ts(31)).unwrap().is_empty());

    let chain = loader.get_next_option_chain(ts(32)).unwrap();
    assert_eq!(chain.len(), 1);
    assert_eq!(chain[0].option_type, OptionType::Put);
}

#[test]
fn test_timestamp_errors() {
    let dir = TempDir::new().unwrap();
    let path = sqlite_fixture(&dir);
    let mut loader = open_loader(&path, xyz(), FieldSet::default());

    assert_eq!(
        loader.get_next_option_chain(ts(36)),
        Err(Error::NotFound(ts(36)))
    );
    assert!(matches!(
        loader.get_next_option_chain(ts(45)),
        Err(Error::OutOfRange { .. })
    ));
}

#[test]
fn test_records_expose_requested_fields_only() {
    let dir = TempDir::new().unwrap();
    let path = sqlite_fixture(&dir);
    let fields = FieldSet::new([QuoteField::OpenInterest, QuoteField::QuoteDatetime]);
    let mut loader = open_loader(&path, xyz().with_option_type(OptionType::Call), fields);
    let chain = loader.get_next_option_chain(ts(31)).unwrap();

    assert_eq!(chain[0].open_interest, Some(100));
    assert_eq!(chain[0].quote_datetime, Some(ts(31)));
    for record in &chain {
        assert_eq!(record.bid, None);
        assert_eq!(record.ask, None);
        assert_eq!(record.delta, None);
        assert_eq!(record.implied_volatility, None);
    }
}

#[test]
fn test_subscriber_sees_each_chain() {
    let dir = TempDir::new().unwrap();
    let path = sqlite_fixture(&dir);
    let mut loader = open_loader(&path, xyz(), FieldSet::default()).with_block_size(2);
    let seen: Rc<RefCell<Vec<(NaiveDateTime, usize)>>> = Rc::default();
    let sink = Rc::clone(&seen);
    loader.bind(Box::new(
        move |timestamp: NaiveDateTime, chain: &[OptionRecord]| -> Result<()> {
            sink.borrow_mut().push((timestamp, chain.len()));
            Ok(())
        },
    ));

    for timestamp in loader.timestamps().to_vec() {
        loader.get_next_option_chain(timestamp).unwrap();
    }
    assert_eq!(
        *seen.borrow(),
        vec![(ts(31), 4), (ts(32), 5), (ts(33), 5), (ts(34), 5), (ts(35), 5)]
    );
}

#[test]
fn test_mapped_schema() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mapped.db");
    let connection = Connection::open(&path).unwrap();
    connection
        .execute_batch(
            "CREATE TABLE quotes (
                contract TEXT, underlying TEXT, expiry TEXT, strike REAL,
                cp INTEGER, quote_time TEXT, iv REAL
            );
            INSERT INTO quotes VALUES
                ('XYZ200117C100', 'XYZ', '2020-01-17', 100, 1, '2020-01-02 09:31:00', 0.25),
                ('XYZ200117P100', 'XYZ', '2020-01-17', 100, 2, '2020-01-02 09:31:00', 0.375);",
        )
        .unwrap();

    let columns = ColumnMapping::new()
        .with_column(QuoteField::OptionId, "contract")
        .with_column(QuoteField::Symbol, "underlying")
        .with_column(QuoteField::Expiration, "expiry")
        .with_column(QuoteField::OptionType, "cp")
        .with_column(QuoteField::QuoteDatetime, "quote_time")
        .with_column(QuoteField::ImpliedVolatility, "iv");
    let store = SqliteQuoteStore::with_schema(&path, "quotes", columns).unwrap();
    let mut loader = SqlDataLoader::new(
        store,
        ts(0),
        ts(59),
        xyz().with_option_type(OptionType::Put),
        FieldSet::new([QuoteField::ImpliedVolatility]),
    )
    .unwrap();

    let chain = loader.get_next_option_chain(ts(31)).unwrap();
    assert_eq!(chain.len(), 1);
    assert_eq!(chain[0].option_id, "XYZ200117P100");
    assert_eq!(chain[0].implied_volatility, Some(dec!(0.375)));
}

#[test]
fn test_missing_database_fails_construction() {
    let dir = TempDir::new().unwrap();
    let err = SqlDataLoader::new(
        SqliteQuoteStore::new(dir.path().join("absent.db")),
        ts(30),
        ts(40),
        xyz(),
        FieldSet::default(),
    )
    .unwrap_err();
    assert!(err.is_store_error());
}

#[test]
fn test_fractional_second_timestamps_reach_block_end() {
    let dir = TempDir::new().unwrap();
    let path = untyped_fixture(
        &dir,
        "(1, 'XYZ', '2020-01-17', 100, 1, '2020-01-02 09:31:00.000', 1.5),
         (1, 'XYZ', '2020-01-17', 100, 1, '2020-01-02 09:32:00.000', 1.75)",
    );
    let mut loader =
        open_loader(&path, xyz(), FieldSet::new([QuoteField::Bid])).with_block_size(1);
    assert_eq!(loader.timestamps(), &[ts(31), ts(32)]);

    assert_eq!(loader.get_next_option_chain(ts(31)).unwrap().len(), 1);
    assert_eq!(loader.cache_span(), Some(CacheSpan::new(ts(31), ts(32))));
    let chain = loader.get_next_option_chain(ts(32)).unwrap();
    assert_eq!(loader.cache_span(), Some(CacheSpan::new(ts(31), ts(32))));
    assert_eq!(chain.len(), 1);
    assert_eq!(chain[0].bid, Some(dec!(1.75)));
}

#[test]
fn test_t_separated_timestamps_are_indexed() {
    let dir = TempDir::new().unwrap();
    let path = untyped_fixture(
        &dir,
        "(1, 'XYZ', '2020-01-17', 100, 1, '2020-01-02T09:31:00', 1.5),
         (2, 'XYZ', '2020-01-17', 110, 1, '2020-01-02T09:31:00', 0.5)",
    );
    let mut loader = open_loader(&path, xyz(), FieldSet::default());
    assert_eq!(loader.timestamps(), &[ts(31)]);
    assert_eq!(
        ids(&loader.get_next_option_chain(ts(31)).unwrap()),
        vec!["1", "2"]
    );
}

#[test]
fn test_epoch_second_timestamps() {
    let dir = TempDir::new().unwrap();
    let path = untyped_fixture(
        &dir,
        "(1, 'XYZ', '2020-01-17', 100, 1, 1577957460, 1.5),
         (1, 'XYZ', '2020-01-17', 100, 1, 1577957520, 1.75),
         (1, 'XYZ', '2020-01-17', 100, 1, 1577958300, 2.0)",
    );
    let mut loader = open_loader(&path, xyz(), FieldSet::new([QuoteField::QuoteDatetime]));
    assert_eq!(loader.timestamps(), &[ts(31), ts(32)]);

    let chain = loader.get_next_option_chain(ts(32)).unwrap();
    assert_eq!(chain.len(), 1);
    assert_eq!(chain[0].quote_datetime, Some(ts(32)));
}

#[test]
fn test_expiration_stored_as_timestamp_matches_date_bounds() {
    let dir = TempDir::new().unwrap();
    let path = untyped_fixture(
        &dir,
        "(1, 'XYZ', '2020-01-17 00:00:00', 100, 1, '2020-01-02 09:31:00', 1.5),
         (2, 'XYZ', '2020-02-21 00:00:00', 100, 1, '2020-01-02 09:31:00', 2.5)",
    );
    let january = NaiveDate::from_ymd_opt(2020, 1, 17);

    let mut loader = open_loader(
        &path,
        xyz().with_expiration_range(None, january),
        FieldSet::default(),
    );
    let chain = loader.get_next_option_chain(ts(31)).unwrap();
    assert_eq!(ids(&chain), vec!["1"]);
    assert_eq!(
        chain[0].expiration,
        NaiveDate::from_ymd_opt(2020, 1, 17).unwrap()
    );

    let mut loader = open_loader(
        &path,
        xyz().with_expiration_range(january, january),
        FieldSet::default(),
    );
    assert_eq!(ids(&loader.get_next_option_chain(ts(31)).unwrap()), vec!["1"]);
}

#[test]
fn test_text_option_types_and_strikes_match_filters() {
    let dir = TempDir::new().unwrap();
    let path = untyped_fixture(
        &dir,
        "(1, 'XYZ', '2020-01-17', '100', 'C', '2020-01-02 09:31:00', 1.5),
         (2, 'XYZ', '2020-01-17', '100', 'put', '2020-01-02 09:31:00', 0.5),
         (3, 'XYZ', '2020-01-17', '110', 'CALL', '2020-01-02 09:31:00', 1.0),
         (4, 'XYZ', '2020-01-17', '110', 2, '2020-01-02 09:31:00', 0.75)",
    );

    let calls = xyz().with_option_type(OptionType::Call);
    let mut loader = open_loader(&path, calls, FieldSet::default());
    assert_eq!(
        ids(&loader.get_next_option_chain(ts(31)).unwrap()),
        vec!["1", "3"]
    );

    let puts = xyz().with_option_type(OptionType::Put);
    let mut loader = open_loader(&path, puts, FieldSet::default());
    let chain = loader.get_next_option_chain(ts(31)).unwrap();
    assert_eq!(ids(&chain), vec!["2", "4"]);
    assert!(chain.iter().all(|r| r.option_type == OptionType::Put));

    let filter = xyz().with_strike_range(Some(dec!(110)), Some(dec!(110)));
    let mut loader = open_loader(&path, filter, FieldSet::default());
    let chain = loader.get_next_option_chain(ts(31)).unwrap();
    let mut matched = ids(&chain);
    matched.sort_unstable();
    assert_eq!(matched, vec!["3", "4"]);
}
