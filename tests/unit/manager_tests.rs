//! Integration tests for the backtest driver.

use crate::fixtures::{csv_fixture, sqlite_fixture, ts};
use chrono::NaiveDateTime;
use option_chain_loader::config::LoaderConfig;
use option_chain_loader::manager::OptionTestManager;
use option_chain_loader::model::{FieldSet, OptionRecord, OptionType, QuoteField, SelectFilter};
use option_chain_loader::{Error, Result};
use rust_decimal::Decimal;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use tempfile::TempDir;

type Tape = Rc<RefCell<Vec<(NaiveDateTime, Vec<Decimal>)>>>;

fn recorder(tape: &Tape) -> Box<dyn option_chain_loader::loader::ChainSubscriber> {
    let sink = Rc::clone(tape);
    Box::new(
        move |timestamp: NaiveDateTime, chain: &[OptionRecord]| -> Result<()> {
            sink.borrow_mut()
                .push((timestamp, chain.iter().filter_map(OptionRecord::mid).collect()));
            Ok(())
        },
    )
}

fn write_config(dir: &TempDir, json: &str) -> LoaderConfig {
    let path = dir.path().join("loader.json");
    std::fs::write(&path, json).unwrap();
    LoaderConfig::from_path(&path).unwrap()
}

fn call_filter() -> SelectFilter {
    SelectFilter::new("XYZ")
        .unwrap()
        .with_option_type(OptionType::Call)
}

fn replay(config: &LoaderConfig) -> Vec<(NaiveDateTime, Vec<Decimal>)> {
    let tape: Tape = Rc::default();
    let mut manager = OptionTestManager::new(
        config,
        ts(30),
        ts(40),
        call_filter(),
        FieldSet::new([QuoteField::Bid, QuoteField::Ask]),
        recorder(&tape),
    )
    .unwrap();
    assert_eq!(manager.run().unwrap(), 5);
    tape.take()
}

#[test]
fn test_sql_and_file_loaders_replay_identically() {
    let dir = TempDir::new().unwrap();
    let db = sqlite_fixture(&dir);
    let csv = csv_fixture(&dir);

    let sql = write_config(
        &dir,
        &json!({"kind": "SQL_DATA_LOADER", "source": db, "block_size": 2}).to_string(),
    );
    let file = write_config(
        &dir,
        &json!({"kind": "file", "source": csv, "block_size": 4}).to_string(),
    );

    let from_sql = replay(&sql);
    let from_file = replay(&file);
    assert_eq!(from_sql.len(), 5);
    assert_eq!(from_sql, from_file);
    assert!(from_sql.iter().all(|(_, mids)| mids.len() == 4));
}

#[test]
fn test_loader_accessors_through_manager() {
    let dir = TempDir::new().unwrap();
    let config = LoaderConfig::new(
        option_chain_loader::config::LoaderKind::Sql,
        sqlite_fixture(&dir),
    );
    let tape: Tape = Rc::default();
    let mut manager = OptionTestManager::new(
        &config,
        ts(30),
        ts(40),
        call_filter(),
        FieldSet::default(),
        recorder(&tape),
    )
    .unwrap();

    assert_eq!(manager.loader().select_filter().symbol(), "XYZ");
    assert_eq!(manager.loader().timestamps().len(), 5);
    assert!(manager.loader().fields().is_empty());

    let chain = manager.loader_mut().get_next_option_chain(ts(33)).unwrap();
    assert_eq!(chain.len(), 4);
    assert_eq!(tape.borrow().len(), 1);
    assert!(tape.borrow()[0].1.is_empty());
}

#[test]
fn test_inverted_range_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = LoaderConfig::new(
        option_chain_loader::config::LoaderKind::File,
        csv_fixture(&dir),
    );
    let tape: Tape = Rc::default();
    let err = OptionTestManager::new(
        &config,
        ts(40),
        ts(30),
        call_filter(),
        FieldSet::default(),
        recorder(&tape),
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::InvalidRange {
            start: ts(40),
            end: ts(30)
        }
    );
}
