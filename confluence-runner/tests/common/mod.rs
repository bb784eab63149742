//! In-memory collaborators and candle fixtures shared by the runner tests.
//!
//! The hourly base series is a slow slide that fires no technical rule.
//! BTC bends it into higher lows, BTC and ETH get a rounding daily bottom,
//! XYZ only has ten hourly bars.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use confluence_core::data::{
    FearGreedSource, MarketDataProvider, PriceLookup, ProviderError, SentimentSource, TickerMap,
    TransferFeed, UniverseSource,
};
use confluence_core::domain::{
    Candle, DestinationType, Interval, Selection, TransferEvent, UniverseAsset,
};
use confluence_runner::notify::{NotificationSink, NotifyError};
use confluence_runner::store::{SelectionStore, StoreError};

// ─── Candles ─────────────────────────────────────────────────────────

pub fn candle(hour: usize, open: f64, high: f64, low: f64, close: f64) -> Candle {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    Candle {
        open_time: base + Duration::hours(hour as i64),
        open,
        high,
        low,
        close,
        volume: 1_000.0,
    }
}

pub fn quiet_hourly() -> Vec<Candle> {
    (0..100)
        .map(|i| {
            let close = 100.0 + 0.2 * (99 - i) as f64;
            candle(i, close + 0.2, close + 0.5, close - 0.5, close)
        })
        .collect()
}

pub fn higher_lows_hourly() -> Vec<Candle> {
    let mut hourly = quiet_hourly();
    hourly[97].low = 97.0;
    hourly[98].low = 98.0;
    hourly[99].low = 99.0;
    hourly
}

pub fn flat_daily() -> Vec<Candle> {
    (0..30).map(|i| candle(i * 24, 100.0, 101.0, 99.0, 100.0)).collect()
}

pub fn rounding_daily() -> Vec<Candle> {
    let mut daily = flat_daily();
    daily[15] = candle(15 * 24, 100.0, 101.0, 89.0, 90.0);
    daily
}

// ─── Market ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FixtureMarket {
    pub tickers: TickerMap,
    pub hourly: HashMap<String, Vec<Candle>>,
    pub daily: HashMap<String, Vec<Candle>>,
    pub funding: HashMap<String, f64>,
    pub tickers_down: bool,
    pub candle_calls: Mutex<Vec<String>>,
}

impl FixtureMarket {
    /// BTC, ETH and XYZ listed against USDT at 100; NOPE is not listed.
    pub fn scenario() -> Self {
        let mut market = Self::default();
        for pair in ["BTCUSDT", "ETHUSDT", "XYZUSDT"] {
            market.tickers.insert(pair.into(), 100.0);
        }
        market.hourly.insert("BTCUSDT".into(), higher_lows_hourly());
        market.daily.insert("BTCUSDT".into(), rounding_daily());
        market.hourly.insert("ETHUSDT".into(), quiet_hourly());
        market.daily.insert("ETHUSDT".into(), rounding_daily());
        market.hourly.insert("XYZUSDT".into(), quiet_hourly()[90..].to_vec());
        market.daily.insert("XYZUSDT".into(), flat_daily());
        market.funding.insert("BTCUSDT".into(), -0.02);
        market.funding.insert("ETHUSDT".into(), -0.02);
        market
    }
}

impl MarketDataProvider for FixtureMarket {
    fn name(&self) -> &str {
        "fixture"
    }

    fn list_tickers(&self) -> Result<TickerMap, ProviderError> {
        if self.tickers_down {
            return Err(ProviderError::NetworkUnreachable("venue offline".into()));
        }
        Ok(self.tickers.clone())
    }

    fn fetch_candles(
        &self,
        pair: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, ProviderError> {
        self.candle_calls.lock().unwrap().push(format!("{pair}:{interval}"));
        let series = match interval {
            Interval::Hour1 => &self.hourly,
            Interval::Day1 => &self.daily,
        };
        let candles = series
            .get(pair)
            .ok_or_else(|| ProviderError::NotFound(pair.to_string()))?;
        Ok(candles[candles.len().saturating_sub(limit)..].to_vec())
    }

    fn fetch_funding_rate(&self, pair: &str) -> Result<f64, ProviderError> {
        self.funding
            .get(pair)
            .copied()
            .ok_or_else(|| ProviderError::NotFound(pair.to_string()))
    }
}

// ─── Signal sources ──────────────────────────────────────────────────

pub struct FixtureUniverse {
    pub assets: Vec<&'static str>,
    pub stables: Vec<&'static str>,
    pub down: bool,
}

impl FixtureUniverse {
    pub fn scenario() -> Self {
        Self {
            assets: vec!["BTC", "USDT", "ETH", "XYZ", "NOPE"],
            stables: vec!["USDT"],
            down: false,
        }
    }
}

impl UniverseSource for FixtureUniverse {
    fn ranked_assets(&self, limit: usize) -> Result<Vec<UniverseAsset>, ProviderError> {
        if self.down {
            return Err(ProviderError::RateLimited { retry_after_secs: 60 });
        }
        Ok(self
            .assets
            .iter()
            .enumerate()
            .take(limit)
            .map(|(i, s)| UniverseAsset::new(*s, i as u32 + 1))
            .collect())
    }

    fn stablecoins(&self) -> Result<HashSet<String>, ProviderError> {
        Ok(self.stables.iter().map(|s| s.to_string()).collect())
    }
}

pub struct FixtureSentiment;

impl SentimentSource for FixtureSentiment {
    fn social_scores(&self) -> Result<HashMap<String, f64>, ProviderError> {
        Ok(HashMap::from([("BTC".to_string(), 80.0)]))
    }
}

pub struct FixtureTransfers;

impl TransferFeed for FixtureTransfers {
    fn recent_transfers(&self, _since: DateTime<Utc>) -> Result<Vec<TransferEvent>, ProviderError> {
        Ok(vec![TransferEvent {
            symbol: "ETH".into(),
            destination: DestinationType::Exchange,
        }])
    }
}

pub struct FixedFear(pub u8);

impl FearGreedSource for FixedFear {
    fn index(&self) -> Result<u8, ProviderError> {
        Ok(self.0)
    }
}

// ─── Prices, store, sink ─────────────────────────────────────────────

pub struct FixedPrices(pub HashMap<String, f64>);

impl FixedPrices {
    pub fn new(prices: &[(&str, f64)]) -> Self {
        Self(prices.iter().map(|(s, p)| (s.to_string(), *p)).collect())
    }
}

impl PriceLookup for FixedPrices {
    fn current_price(&self, symbol: &str) -> Result<f64, ProviderError> {
        self.0
            .get(symbol)
            .copied()
            .ok_or_else(|| ProviderError::NotFound(symbol.to_string()))
    }
}

pub struct BrokenStore;

impl SelectionStore for BrokenStore {
    fn write_selection(&self, _: &Selection) -> Result<(), StoreError> {
        Err(StoreError::Io {
            path: "/read-only/selection.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }

    fn read_selection(&self) -> Result<Option<Selection>, StoreError> {
        Ok(None)
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    fn notify(&self, message: &str) -> Result<(), NotifyError> {
        self.messages.lock().unwrap().push(message.to_string());
        Ok(())
    }
}
