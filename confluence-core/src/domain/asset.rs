//! Per-asset scan inputs and universe entries.

use serde::{Deserialize, Serialize};

use super::candle::Candle;
use super::signals::Lookup;

/// Number of hourly bars kept in an asset's scoring window.
pub const HOURLY_WINDOW: usize = 100;

/// Number of daily bars kept in an asset's scoring window.
pub const DAILY_WINDOW: usize = 30;

/// One entry of the ranked asset universe (base asset, not a venue pair).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseAsset {
    /// Upper-case base asset identifier, e.g. `BTC`.
    pub symbol: String,
    /// Market-cap rank reported by the universe source (1 = largest).
    pub rank: u32,
    /// Stable-value assets are excluded from every scan.
    pub is_stable: bool,
}

impl UniverseAsset {
    pub fn new(symbol: impl Into<String>, rank: u32) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            rank,
            is_stable: false,
        }
    }
}

/// Everything known about one asset for a single scan.
///
/// Owned per scan and discarded after scoring. The constructor trims the
/// candle sequences to the newest [`HOURLY_WINDOW`] / [`DAILY_WINDOW`] bars.
#[derive(Debug, Clone)]
pub struct AssetContext {
    /// Upper-case base asset (e.g. `BTC`), the key for external signals.
    pub base: String,
    /// Venue symbol the candles were fetched for (e.g. `BTCUSDT`).
    pub symbol: String,
    pub hourly: Vec<Candle>,
    pub daily: Vec<Candle>,
    /// Last traded price from the venue ticker map.
    pub price: f64,
    pub funding_rate: Lookup<f64>,
}

impl AssetContext {
    pub fn new(
        base: impl Into<String>,
        symbol: impl Into<String>,
        hourly: Vec<Candle>,
        daily: Vec<Candle>,
        price: f64,
        funding_rate: Lookup<f64>,
    ) -> Self {
        Self {
            base: base.into().to_uppercase(),
            symbol: symbol.into(),
            hourly: newest(hourly, HOURLY_WINDOW),
            daily: newest(daily, DAILY_WINDOW),
            price,
            funding_rate,
        }
    }
}

fn newest(mut candles: Vec<Candle>, window: usize) -> Vec<Candle> {
    if candles.len() > window {
        candles.drain(..candles.len() - window);
    }
    candles
}
