//! Scan cycle: universe → per-asset market data → scoring → top-K selection.
//!
//! Assets are fetched one at a time with a fixed pause between them to stay
//! inside the venue's rate limits, then scored in parallel. Per-asset faults
//! (stable asset, not listed, candle fetch failure, malformed candles, short
//! history) skip that asset and are reported; only a failed ticker listing
//! aborts the scan.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use confluence_core::data::{
    FearGreedSource, MarketDataProvider, ProviderError, SentimentSource, TransferFeed,
    UniverseSource,
};
use confluence_core::domain::{
    AssetContext, ExternalSignals, Interval, Lookup, ScoredCandidate, Selection, UniverseAsset,
};
use confluence_core::{rank, score_all, ScoreError};

use crate::notify::{deliver, selection_message, NotificationSink};
use crate::signals::{gather_signals, SignalSources};
use crate::store::{SelectionStore, StoreError};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("market data unavailable: {0}")]
    Market(#[source] ProviderError),
}

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("asset universe unavailable: {0}")]
    Universe(#[source] ProviderError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("failed to persist selection: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    Stable,
    NotListed,
    CandlesUnavailable(String),
    InsufficientHistory(String),
    InvalidPrice(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Stable => write!(f, "stable asset"),
            SkipReason::NotListed => write!(f, "no tradable pair"),
            SkipReason::CandlesUnavailable(e) => write!(f, "candles unavailable: {e}"),
            SkipReason::InsufficientHistory(e) => write!(f, "insufficient history: {e}"),
            SkipReason::InvalidPrice(e) => write!(f, "invalid price: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedAsset {
    /// Base asset as it appears in the universe (e.g. `ETH`).
    pub symbol: String,
    /// Venue pair, once one was resolved.
    pub pair: Option<String>,
    pub reason: SkipReason,
}

/// Outcome of one scan: the selection plus everything needed to explain it.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub selection: Selection,
    /// Every scored asset, in universe order.
    pub scored: Vec<ScoredCandidate>,
    pub skipped: Vec<SkippedAsset>,
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub hourly_limit: usize,
    pub daily_limit: usize,
    pub request_delay: Duration,
    pub quote_currencies: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            hourly_limit: confluence_core::domain::HOURLY_WINDOW,
            daily_limit: confluence_core::domain::DAILY_WINDOW,
            request_delay: Duration::ZERO,
            quote_currencies: vec!["USDT".into(), "USDC".into()],
        }
    }
}

pub struct Scanner<'a> {
    market: &'a dyn MarketDataProvider,
    options: ScanOptions,
}

impl<'a> Scanner<'a> {
    pub fn new(market: &'a dyn MarketDataProvider, options: ScanOptions) -> Self {
        Self { market, options }
    }

    pub fn run_scan(
        &self,
        universe: &[UniverseAsset],
        signals: &ExternalSignals,
    ) -> Result<ScanReport, ScanError> {
        self.run_scan_at(universe, signals, Utc::now())
    }

    /// [`run_scan`](Self::run_scan) with an explicit selection timestamp.
    pub fn run_scan_at(
        &self,
        universe: &[UniverseAsset],
        signals: &ExternalSignals,
        now: DateTime<Utc>,
    ) -> Result<ScanReport, ScanError> {
        let tickers = self.market.list_tickers().map_err(ScanError::Market)?;
        let mut skipped = Vec::new();
        let mut contexts = Vec::new();
        let mut fetched_any = false;

        for asset in universe {
            if asset.is_stable || signals.is_stable(&asset.symbol) {
                skipped.push(skip(&asset.symbol, None, SkipReason::Stable));
                continue;
            }
            let Some(pair) =
                self.market
                    .resolve_pair(&asset.symbol, &self.options.quote_currencies, &tickers)
            else {
                skipped.push(skip(&asset.symbol, None, SkipReason::NotListed));
                continue;
            };

            if fetched_any && !self.options.request_delay.is_zero() {
                std::thread::sleep(self.options.request_delay);
            }
            fetched_any = true;

            match self.load_context(asset, &pair, tickers.get(&pair).copied()) {
                Ok(ctx) => contexts.push(ctx),
                Err(reason) => {
                    warn!(symbol = %pair, %reason, "asset skipped");
                    skipped.push(skip(&asset.symbol, Some(&pair), reason));
                }
            }
        }

        let mut scored = Vec::with_capacity(contexts.len());
        for (ctx, result) in contexts.iter().zip(score_all(&contexts, signals)) {
            match result {
                Ok(candidate) => {
                    debug!(symbol = candidate.symbol(), score = candidate.score(), "scored");
                    scored.push(candidate);
                }
                Err(e) => {
                    warn!(symbol = e.symbol(), error = %e, "asset excluded from scoring");
                    let reason = match e {
                        ScoreError::InsufficientHistory { .. } => {
                            SkipReason::InsufficientHistory(e.to_string())
                        }
                        ScoreError::InvalidPrice { .. } => SkipReason::InvalidPrice(e.to_string()),
                    };
                    skipped.push(skip(&ctx.base, Some(e.symbol()), reason));
                }
            }
        }

        let selection = rank(scored.clone(), now);
        info!(
            universe = universe.len(),
            scored = scored.len(),
            skipped = skipped.len(),
            selected = selection.len(),
            "scan complete"
        );
        Ok(ScanReport {
            selection,
            scored,
            skipped,
        })
    }

    fn load_context(
        &self,
        asset: &UniverseAsset,
        pair: &str,
        price: Option<f64>,
    ) -> Result<AssetContext, SkipReason> {
        let hourly = self
            .market
            .fetch_candles(pair, Interval::Hour1, self.options.hourly_limit)
            .map_err(|e| SkipReason::CandlesUnavailable(e.to_string()))?;
        let daily = self
            .market
            .fetch_candles(pair, Interval::Day1, self.options.daily_limit)
            .map_err(|e| SkipReason::CandlesUnavailable(e.to_string()))?;
        if hourly.is_empty() && daily.is_empty() {
            return Err(SkipReason::CandlesUnavailable("no candles returned".into()));
        }
        for (interval, candles) in [(Interval::Hour1, &hourly), (Interval::Day1, &daily)] {
            if let Some(bad) = candles.iter().find(|c| !c.is_sane()) {
                return Err(SkipReason::CandlesUnavailable(format!(
                    "malformed {interval} candle at {}",
                    bad.open_time.format("%Y-%m-%d %H:%M")
                )));
            }
        }

        let funding_rate = match self.market.fetch_funding_rate(pair) {
            Ok(rate) => Lookup::Available(rate),
            Err(e) => {
                debug!(symbol = pair, error = %e, "funding rate unavailable");
                Lookup::Unavailable
            }
        };

        Ok(AssetContext::new(
            &asset.symbol,
            pair,
            hourly,
            daily,
            price.unwrap_or(f64::NAN),
            funding_rate,
        ))
    }
}

fn skip(symbol: &str, pair: Option<&str>, reason: SkipReason) -> SkippedAsset {
    SkippedAsset {
        symbol: symbol.to_string(),
        pair: pair.map(str::to_string),
        reason,
    }
}

/// Everything one scan cycle talks to.
pub struct ScanCycle<'a> {
    pub market: &'a dyn MarketDataProvider,
    pub universe: &'a dyn UniverseSource,
    pub sentiment: Option<&'a dyn SentimentSource>,
    pub transfers: Option<&'a dyn TransferFeed>,
    pub fear_greed: Option<&'a dyn FearGreedSource>,
    pub store: &'a dyn SelectionStore,
    pub sink: &'a dyn NotificationSink,
}

#[derive(Debug, Clone)]
pub struct CycleOptions {
    pub universe_size: usize,
    pub transfer_window: ChronoDuration,
    pub scan: ScanOptions,
}

impl Default for CycleOptions {
    fn default() -> Self {
        Self {
            universe_size: 100,
            transfer_window: ChronoDuration::hours(24),
            scan: ScanOptions::default(),
        }
    }
}

/// Gather signals, scan the universe, persist the selection, announce it.
///
/// A store failure is fatal; a notification failure is only logged.
pub fn run_scan_cycle(
    cycle: &ScanCycle<'_>,
    options: &CycleOptions,
) -> Result<ScanReport, CycleError> {
    let now = Utc::now();
    let sources = SignalSources {
        universe: Some(cycle.universe),
        sentiment: cycle.sentiment,
        transfers: cycle.transfers,
        fear_greed: cycle.fear_greed,
    };
    let signals = gather_signals(&sources, now, options.transfer_window);

    let mut universe = cycle
        .universe
        .ranked_assets(options.universe_size)
        .map_err(CycleError::Universe)?;
    for asset in &mut universe {
        asset.is_stable = asset.is_stable || signals.is_stable(&asset.symbol);
    }

    let report =
        Scanner::new(cycle.market, options.scan.clone()).run_scan_at(&universe, &signals, now)?;
    cycle.store.write_selection(&report.selection)?;
    deliver(cycle.sink, &selection_message(&report.selection));
    Ok(report)
}
