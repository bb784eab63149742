//! Scan cycle integration: fixture market and signal sources through
//! `Scanner` and `run_scan_cycle`, persisted to a real JSON store.

mod common;

use chrono::{TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use tempfile::TempDir;

use confluence_core::domain::{
    DestinationType, ExternalSignals, Lookup, TransferEvent, UniverseAsset,
};
use confluence_runner::scan::{
    run_scan_cycle, CycleError, CycleOptions, ScanCycle, ScanError, ScanOptions, Scanner,
    SkipReason,
};
use confluence_runner::store::{JsonFileStore, SelectionStore};

use common::*;

fn scenario_signals(fear_greed: u8) -> ExternalSignals {
    ExternalSignals {
        stablecoins: HashSet::from(["USDT".to_string()]),
        social_scores: Lookup::Available(HashMap::from([("BTC".to_string(), 80.0)])),
        transfers: Lookup::Available(vec![TransferEvent {
            symbol: "ETH".into(),
            destination: DestinationType::Exchange,
        }]),
        fear_greed: Lookup::Available(fear_greed),
    }
}

fn universe() -> Vec<UniverseAsset> {
    ["BTC", "USDT", "ETH", "XYZ", "NOPE"]
        .iter()
        .enumerate()
        .map(|(i, s)| UniverseAsset::new(*s, i as u32 + 1))
        .collect()
}

fn picks(selection: &confluence_core::domain::Selection) -> Vec<(&str, u32)> {
    selection
        .candidates
        .iter()
        .map(|c| (c.symbol(), c.score()))
        .collect()
}

// ─── Scanner ─────────────────────────────────────────────────────────

#[test]
fn scanner_ranks_btc_over_eth_and_reports_skips() {
    let market = FixtureMarket::scenario();
    let now = Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap();
    let report = Scanner::new(&market, ScanOptions::default())
        .run_scan_at(&universe(), &scenario_signals(50), now)
        .unwrap();

    assert_eq!(picks(&report.selection), vec![("BTCUSDT", 27), ("ETHUSDT", 19)]);
    assert_eq!(report.selection.created_at, now);
    assert_eq!(report.scored.len(), 2);

    let skipped: Vec<(&str, Option<&str>, &SkipReason)> = report
        .skipped
        .iter()
        .map(|s| (s.symbol.as_str(), s.pair.as_deref(), &s.reason))
        .collect();
    assert_eq!(skipped.len(), 3);
    assert_eq!(skipped[0], ("USDT", None, &SkipReason::Stable));
    assert_eq!(skipped[1], ("NOPE", None, &SkipReason::NotListed));
    assert_eq!((skipped[2].0, skipped[2].1), ("XYZ", Some("XYZUSDT")));
    assert!(matches!(skipped[2].2, SkipReason::InsufficientHistory(msg) if msg.contains("got 10")));
}

#[test]
fn stable_and_unlisted_assets_are_never_fetched() {
    let market = FixtureMarket::scenario();
    Scanner::new(&market, ScanOptions::default())
        .run_scan(&universe(), &scenario_signals(50))
        .unwrap();
    let calls = market.candle_calls.lock().unwrap().clone();
    assert!(calls.iter().all(|c| !c.starts_with("USDT") && !c.starts_with("NOPE")));
    assert_eq!(calls.len(), 6);
}

#[test]
fn extreme_fear_lifts_the_whole_selection() {
    let market = FixtureMarket::scenario();
    let report = Scanner::new(&market, ScanOptions::default())
        .run_scan(&universe(), &scenario_signals(18))
        .unwrap();
    assert_eq!(picks(&report.selection), vec![("BTCUSDT", 32), ("ETHUSDT", 24)]);
}

#[test]
fn missing_candles_skip_only_that_asset() {
    let mut market = FixtureMarket::scenario();
    market.daily.remove("ETHUSDT");
    let report = Scanner::new(&market, ScanOptions::default())
        .run_scan(&universe(), &scenario_signals(50))
        .unwrap();
    assert_eq!(picks(&report.selection), vec![("BTCUSDT", 27)]);
    assert!(report
        .skipped
        .iter()
        .any(|s| s.symbol == "ETH" && matches!(s.reason, SkipReason::CandlesUnavailable(_))));
}

#[test]
fn inverted_bar_skips_the_asset() {
    let mut market = FixtureMarket::scenario();
    let hourly = market.hourly.get_mut("ETHUSDT").unwrap();
    hourly[50].high = hourly[50].low - 1.0;
    let report = Scanner::new(&market, ScanOptions::default())
        .run_scan(&universe(), &scenario_signals(50))
        .unwrap();
    assert_eq!(picks(&report.selection), vec![("BTCUSDT", 27)]);

    let eth = report.skipped.iter().find(|s| s.symbol == "ETH").unwrap();
    assert_eq!(eth.pair.as_deref(), Some("ETHUSDT"));
    assert!(matches!(
        &eth.reason,
        SkipReason::CandlesUnavailable(msg) if msg.contains("malformed 1h")
    ));
}

#[test]
fn missing_funding_only_drops_the_squeeze_rule() {
    let mut market = FixtureMarket::scenario();
    market.funding.clear();
    let report = Scanner::new(&market, ScanOptions::default())
        .run_scan(&universe(), &scenario_signals(50))
        .unwrap();
    assert_eq!(picks(&report.selection), vec![("BTCUSDT", 19), ("ETHUSDT", 11)]);
}

#[test]
fn ticker_outage_fails_the_scan() {
    let market = FixtureMarket {
        tickers_down: true,
        ..FixtureMarket::scenario()
    };
    let err = Scanner::new(&market, ScanOptions::default())
        .run_scan(&universe(), &scenario_signals(50))
        .unwrap_err();
    assert!(matches!(err, ScanError::Market(_)));
}

#[test]
fn empty_universe_gives_empty_selection() {
    let market = FixtureMarket::scenario();
    let report = Scanner::new(&market, ScanOptions::default())
        .run_scan(&[], &ExternalSignals::default())
        .unwrap();
    assert!(report.selection.is_empty());
    assert!(report.skipped.is_empty());
}

// ─── Full cycle ──────────────────────────────────────────────────────

struct Fixture {
    market: FixtureMarket,
    universe: FixtureUniverse,
    fear: FixedFear,
    sink: RecordingSink,
    store: JsonFileStore,
    _dir: TempDir,
}

impl Fixture {
    fn new(fear: u8) -> Self {
        let dir = tempfile::tempdir().unwrap();
        Self {
            market: FixtureMarket::scenario(),
            universe: FixtureUniverse::scenario(),
            fear: FixedFear(fear),
            sink: RecordingSink::default(),
            store: JsonFileStore::new(dir.path().join("state/selection.json")),
            _dir: dir,
        }
    }

    fn cycle(&self) -> ScanCycle<'_> {
        ScanCycle {
            market: &self.market,
            universe: &self.universe,
            sentiment: Some(&FixtureSentiment),
            transfers: Some(&FixtureTransfers),
            fear_greed: Some(&self.fear),
            store: &self.store,
            sink: &self.sink,
        }
    }
}

#[test]
fn cycle_persists_and_announces_the_selection() {
    let fx = Fixture::new(50);
    let report = run_scan_cycle(&fx.cycle(), &CycleOptions::default()).unwrap();
    assert_eq!(picks(&report.selection), vec![("BTCUSDT", 27), ("ETHUSDT", 19)]);

    let stored = fx.store.read_selection().unwrap().unwrap();
    assert_eq!(stored, report.selection);

    let messages = fx.sink.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("Top 2 picks"));
    assert!(messages[0]
        .contains("1. BTCUSDT score 27 @ 100 | Rounding Bottom, Higher Lows (Triangle)"));
}

#[test]
fn cycle_replaces_the_previous_selection() {
    let fx = Fixture::new(50);
    run_scan_cycle(&fx.cycle(), &CycleOptions::default()).unwrap();

    let fearful = Fixture::new(18);
    let store = JsonFileStore::new(fx.store.path());
    let cycle = ScanCycle {
        store: &store,
        ..fearful.cycle()
    };
    run_scan_cycle(&cycle, &CycleOptions::default()).unwrap();

    let stored = store.read_selection().unwrap().unwrap();
    assert_eq!(picks(&stored), vec![("BTCUSDT", 32), ("ETHUSDT", 24)]);
}

#[test]
fn cycle_without_optional_sources_still_scores() {
    let fx = Fixture::new(50);
    let cycle = ScanCycle {
        sentiment: None,
        transfers: None,
        fear_greed: None,
        ..fx.cycle()
    };
    let report = run_scan_cycle(&cycle, &CycleOptions::default()).unwrap();
    // Social (10) and whale (6) weights drop out; chart and funding rules remain.
    assert_eq!(picks(&report.selection), vec![("BTCUSDT", 17), ("ETHUSDT", 13)]);
}

#[test]
fn universe_size_limits_the_scan() {
    let fx = Fixture::new(50);
    let options = CycleOptions {
        universe_size: 1,
        ..CycleOptions::default()
    };
    let report = run_scan_cycle(&fx.cycle(), &options).unwrap();
    assert_eq!(picks(&report.selection), vec![("BTCUSDT", 27)]);
}

#[test]
fn store_failure_is_fatal_and_silences_the_announcement() {
    let fx = Fixture::new(50);
    let cycle = ScanCycle {
        store: &BrokenStore,
        ..fx.cycle()
    };
    let err = run_scan_cycle(&cycle, &CycleOptions::default()).unwrap_err();
    assert!(matches!(err, CycleError::Store(_)));
    assert!(fx.sink.messages().is_empty());
}

#[test]
fn universe_outage_is_fatal() {
    let mut fx = Fixture::new(50);
    fx.universe.down = true;
    let err = run_scan_cycle(&fx.cycle(), &CycleOptions::default()).unwrap_err();
    assert!(matches!(err, CycleError::Universe(_)));
    assert!(fx.store.read_selection().unwrap().is_none());
}

#[test]
fn ticker_outage_fails_the_cycle_without_writing() {
    let mut fx = Fixture::new(50);
    fx.market.tickers_down = true;
    let err = run_scan_cycle(&fx.cycle(), &CycleOptions::default()).unwrap_err();
    assert!(matches!(err, CycleError::Scan(ScanError::Market(_))));
    assert!(fx.store.read_selection().unwrap().is_none());
}
