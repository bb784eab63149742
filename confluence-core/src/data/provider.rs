//! Collaborator traits and the shared provider error.
//!
//! Every external service sits behind one of these traits so the runner can
//! be driven by in-memory fakes in tests.

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::domain::{Candle, Interval, TransferEvent, UniverseAsset};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("hard stop: {host} is blocking requests (circuit breaker open)")]
    CircuitBreakerTripped { host: String },

    #[error("provider error: {0}")]
    Other(String),
}

/// Venue symbol → last traded price.
pub type TickerMap = HashMap<String, f64>;

/// Spot/futures market data from a trading venue.
pub trait MarketDataProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Every listed pair with its last price. One call per scan.
    fn list_tickers(&self) -> Result<TickerMap, ProviderError>;

    /// Newest `limit` bars for a venue pair, oldest first.
    fn fetch_candles(
        &self,
        pair: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, ProviderError>;

    /// Latest perpetual funding rate as a fraction (`-0.02` = -2%).
    fn fetch_funding_rate(&self, pair: &str) -> Result<f64, ProviderError>;

    /// First `base + quote` pair present in `tickers`, trying quotes in order.
    fn resolve_pair(&self, base: &str, quotes: &[String], tickers: &TickerMap) -> Option<String> {
        let base = base.to_uppercase();
        quotes
            .iter()
            .map(|quote| format!("{base}{}", quote.to_uppercase()))
            .find(|pair| tickers.contains_key(pair))
    }
}

/// Current price of a venue symbol, used by reconciliation.
pub trait PriceLookup: Send + Sync {
    fn current_price(&self, symbol: &str) -> Result<f64, ProviderError>;
}

/// Market-cap ranked asset universe.
pub trait UniverseSource: Send + Sync {
    /// Top `limit` assets by rank, best first.
    fn ranked_assets(&self, limit: usize) -> Result<Vec<UniverseAsset>, ProviderError>;

    /// Upper-case base identifiers of stable-value assets.
    fn stablecoins(&self) -> Result<HashSet<String>, ProviderError>;
}

pub trait SentimentSource: Send + Sync {
    /// Upper-case base identifier → social score (0-100).
    fn social_scores(&self) -> Result<HashMap<String, f64>, ProviderError>;
}

pub trait TransferFeed: Send + Sync {
    fn recent_transfers(&self, since: DateTime<Utc>) -> Result<Vec<TransferEvent>, ProviderError>;
}

pub trait FearGreedSource: Send + Sync {
    /// Market-wide index, 0 (extreme fear) to 100 (extreme greed).
    fn index(&self) -> Result<u8, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoMarket;

    impl MarketDataProvider for NoMarket {
        fn name(&self) -> &str {
            "none"
        }
        fn list_tickers(&self) -> Result<TickerMap, ProviderError> {
            Ok(TickerMap::new())
        }
        fn fetch_candles(
            &self,
            pair: &str,
            _: Interval,
            _: usize,
        ) -> Result<Vec<Candle>, ProviderError> {
            Err(ProviderError::NotFound(pair.to_string()))
        }
        fn fetch_funding_rate(&self, pair: &str) -> Result<f64, ProviderError> {
            Err(ProviderError::NotFound(pair.to_string()))
        }
    }

    fn quotes() -> Vec<String> {
        vec!["USDT".into(), "USDC".into()]
    }

    #[test]
    fn resolve_prefers_first_quote() {
        let tickers = TickerMap::from([("BTCUSDT".into(), 1.0), ("BTCUSDC".into(), 1.0)]);
        assert_eq!(NoMarket.resolve_pair("btc", &quotes(), &tickers), Some("BTCUSDT".into()));
    }

    #[test]
    fn resolve_falls_back_to_next_quote() {
        let tickers = TickerMap::from([("ETHUSDC".into(), 1.0)]);
        assert_eq!(NoMarket.resolve_pair("ETH", &quotes(), &tickers), Some("ETHUSDC".into()));
    }

    #[test]
    fn resolve_unlisted_is_none() {
        let tickers = TickerMap::from([("ETHUSDT".into(), 1.0)]);
        assert_eq!(NoMarket.resolve_pair("XYZ", &quotes(), &tickers), None);
    }

    #[test]
    fn error_messages_are_displayable() {
        let err = ProviderError::CircuitBreakerTripped {
            host: "api.binance.com".into(),
        };
        assert!(err.to_string().contains("api.binance.com"));
        let err = ProviderError::Status {
            status: 500,
            url: "http://x".into(),
        };
        assert_eq!(err.to_string(), "HTTP 500 from http://x");
    }
}
