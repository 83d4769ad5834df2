//! Integration tests for the CSV-backed loader.

use crate::fixtures::{csv_fixture, ts};
use chrono::NaiveDate;
use option_chain_loader::config::{LoaderConfig, LoaderKind};
use option_chain_loader::loader::{CacheSpan, DataLoader, FileDataLoader};
use option_chain_loader::model::{FieldSet, OptionType, QuoteField, SelectFilter};
use option_chain_loader::store::CsvQuoteStore;
use option_chain_loader::Error;
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn open_loader(dir: &TempDir, filter: SelectFilter, fields: FieldSet) -> FileDataLoader {
    let config = LoaderConfig::new(LoaderKind::File, csv_fixture(dir));
    FileDataLoader::new(
        CsvQuoteStore::from_config(&config),
        ts(30),
        ts(40),
        filter,
        fields,
    )
    .unwrap()
}

#[test]
fn test_end_to_end_block_windows() {
    let dir = TempDir::new().unwrap();
    let filter = SelectFilter::new("XYZ")
        .unwrap()
        .with_option_type(OptionType::Call);
    let mut loader = open_loader(
        &dir,
        filter,
        FieldSet::new([QuoteField::Bid, QuoteField::Ask]),
    )
    .with_block_size(3);

    assert_eq!(loader.timestamps().len(), 5);
    let chain = loader.get_next_option_chain(ts(31)).unwrap();
    assert_eq!(loader.cache_span(), Some(CacheSpan::new(ts(31), ts(34))));
    let ids: Vec<&str> = chain.iter().map(|r| r.option_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
    assert_eq!(chain[1].bid, Some(dec!(1.25)));
    assert_eq!(chain[1].ask, Some(dec!(1.5)));
    assert_eq!(chain[1].delta, None);

    loader.get_next_option_chain(ts(35)).unwrap();
    assert_eq!(loader.cache_span(), Some(CacheSpan::new(ts(35), ts(35))));
}

#[test]
fn test_range_filters_match_sql_semantics() {
    let dir = TempDir::new().unwrap();
    let filter = SelectFilter::new("XYZ")
        .unwrap()
        .with_strike_range(Some(dec!(100)), Some(dec!(110)))
        .with_delta_range(None, Some(dec!(0.5)));
    let mut loader = open_loader(&dir, filter, FieldSet::new([QuoteField::Delta]));
    let chain = loader.get_next_option_chain(ts(32)).unwrap();

    let mut ids: Vec<&str> = chain.iter().map(|r| r.option_id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["2", "4", "5"]);
}

#[test]
fn test_named_range_from_json_filter() {
    let dir = TempDir::new().unwrap();
    let filter: SelectFilter = serde_json::from_str(
        r#"{
            "symbol": "XYZ",
            "option_type": "CALL",
            "expiration_range": {"low": "2020-02-01", "high": null}
        }"#,
    )
    .unwrap();
    let mut loader = open_loader(&dir, filter, FieldSet::default());
    let chain = loader.get_next_option_chain(ts(33)).unwrap();
    assert_eq!(chain.len(), 1);
    assert_eq!(chain[0].option_id, "4");
}

#[test]
fn test_expiration_range_bounds_are_inclusive() {
    let dir = TempDir::new().unwrap();
    let january = NaiveDate::from_ymd_opt(2020, 1, 17);
    let february = NaiveDate::from_ymd_opt(2020, 2, 21);
    let calls = || {
        SelectFilter::new("XYZ")
            .unwrap()
            .with_option_type(OptionType::Call)
    };

    let mut loader = open_loader(
        &dir,
        calls().with_expiration_range(january, january),
        FieldSet::default(),
    );
    let chain = loader.get_next_option_chain(ts(31)).unwrap();
    let ids: Vec<&str> = chain.iter().map(|r| r.option_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);

    let mut loader = open_loader(
        &dir,
        calls().with_expiration_range(february, february),
        FieldSet::default(),
    );
    let chain = loader.get_next_option_chain(ts(31)).unwrap();
    assert_eq!(chain.len(), 1);
    assert_eq!(chain[0].option_id, "4");

    let filter: SelectFilter = serde_json::from_str(
        r#"{"symbol": "XYZ", "expiration_range": {"low": null, "high": "2020-01-17"}}"#,
    )
    .unwrap();
    let mut loader = open_loader(&dir, filter, FieldSet::default());
    let chain = loader.get_next_option_chain(ts(32)).unwrap();
    let mut ids: Vec<&str> = chain.iter().map(|r| r.option_id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["1", "2", "3", "5"]);
}

#[test]
fn test_not_found_and_empty_chain() {
    let dir = TempDir::new().unwrap();
    let filter = SelectFilter::new("XYZ")
        .unwrap()
        .with_option_type(OptionType::Put);
    let mut loader = open_loader(&dir, filter, FieldSet::default());

    assert!(loader.get_next_option_chain(ts(31)).unwrap().is_empty());
    assert_eq!(
        loader.get_next_option_chain(ts(38)),
        Err(Error::NotFound(ts(38)))
    );
}

#[test]
fn test_unknown_symbol_has_empty_index() {
    let dir = TempDir::new().unwrap();
    let mut loader = open_loader(
        &dir,
        SelectFilter::new("QQQ").unwrap(),
        FieldSet::default(),
    );
    assert!(loader.timestamps().is_empty());
    assert_eq!(
        loader.get_next_option_chain(ts(31)),
        Err(Error::NotFound(ts(31)))
    );
}
