//! Option Chain Replay Example
//!
//! This example demonstrates a complete backtest data feed:
//! - Writing a small SQLite quote table
//! - Configuring a SQL loader from JSON
//! - Filtering calls by strike and delta
//! - Receiving each chain in a subscriber
//!
//! Run with: `cargo run --example replay_chains`

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use option_chain_loader::config::LoaderConfig;
use option_chain_loader::manager::OptionTestManager;
use option_chain_loader::model::{FieldSet, OptionRecord, SelectFilter};
use option_chain_loader::Result;
use rusqlite::{Connection, params};
use serde_json::json;
use std::path::Path;
use tracing::info;

fn session_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, 2)
        .unwrap()
        .and_hms_opt(9, 31, 0)
        .unwrap()
}

fn write_quotes(path: &Path) -> rusqlite::Result<()> {
    let connection = Connection::open(path)?;
    connection.execute_batch(
        "CREATE TABLE option_quotes (
            option_id INTEGER, symbol TEXT, expiration TEXT, strike REAL,
            option_type INTEGER, quote_datetime TEXT, spot_price REAL,
            bid REAL, ask REAL, delta REAL, implied_volatility REAL
        )",
    )?;

    let mut insert = connection.prepare(
        "INSERT INTO option_quotes VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;
    for minute in 0..10i64 {
        let at = session_start() + TimeDelta::minutes(minute);
        let spot = 3200.0 + minute as f64 * 0.5;
        for (id, strike) in (3150..=3250).step_by(25).enumerate() {
            let strike = f64::from(strike);
            let moneyness = (spot - strike) / 100.0;
            let call_delta = (0.5 + moneyness).clamp(0.01, 0.99);
            let call_mid = (spot - strike).max(0.0) + 12.0;
            for (option_type, delta, mid) in [
                (1, call_delta, call_mid),
                (2, call_delta - 1.0, call_mid - (spot - strike)),
            ] {
                insert.execute(params![
                    id as i64 * 2 + option_type,
                    "SPXW",
                    "2020-01-17",
                    strike,
                    option_type,
                    at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    spot,
                    mid - 0.25,
                    mid + 0.25,
                    delta,
                    0.18,
                ])?;
            }
        }
    }
    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("=== Option Chain Replay ===");

    let dir = tempfile::tempdir()?;
    let db = dir.path().join("spxw.sqlite");
    write_quotes(&db)?;
    info!("Wrote quote table to {}", db.display());

    let config = LoaderConfig::from_json_str(
        &json!({ "kind": "sql", "source": db, "block_size": 4 }).to_string(),
    )?;

    let filter: SelectFilter = serde_json::from_value(json!({
        "symbol": "SPXW",
        "option_type": "CALL",
        "strike_range": { "low": 3175, "high": 3225 },
        "delta_range": { "low": 0.3 }
    }))?;
    let fields = FieldSet::parse(["bid", "ask", "delta", "spot_price"])?;

    let subscriber = |timestamp: NaiveDateTime, chain: &[OptionRecord]| -> Result<()> {
        info!("--- {timestamp}: {} options ---", chain.len());
        for option in chain {
            info!(
                "  {} {} {} bid={:?} ask={:?} mid={:?} delta={:?}",
                option.symbol,
                option.strike,
                option.option_type,
                option.bid,
                option.ask,
                option.mid(),
                option.delta,
            );
        }
        Ok(())
    };

    let mut manager = OptionTestManager::new(
        &config,
        session_start(),
        session_start() + TimeDelta::minutes(9),
        filter,
        fields,
        Box::new(subscriber),
    )?;
    let chains = manager.run()?;

    info!("Replayed {chains} chains");
    info!("=== Example Complete ===");
    Ok(())
}
