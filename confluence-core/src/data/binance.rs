//! Binance market data: spot tickers and klines, USD-M futures funding.
//!
//! Kline rows arrive as heterogeneous JSON arrays:
//! `[open_time_ms, "open", "high", "low", "close", "volume", close_time_ms, ...]`.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::http::{parse_decimal, HttpClient};
use super::provider::{MarketDataProvider, PriceLookup, ProviderError, TickerMap};
use crate::domain::{Candle, Interval};

pub const DEFAULT_SPOT_URL: &str = "https://api.binance.com";
pub const DEFAULT_FUTURES_URL: &str = "https://fapi.binance.com";

/// Venue cap on bars per kline request.
pub const MAX_KLINES: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumIndex {
    pub symbol: String,
    pub last_funding_rate: String,
}

pub struct BinanceProvider {
    http: HttpClient,
    spot_url: String,
    futures_url: String,
}

impl BinanceProvider {
    pub fn new(
        http: HttpClient,
        spot_url: impl Into<String>,
        futures_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            spot_url: spot_url.into().trim_end_matches('/').to_string(),
            futures_url: futures_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl MarketDataProvider for BinanceProvider {
    fn name(&self) -> &str {
        "binance"
    }

    fn list_tickers(&self) -> Result<TickerMap, ProviderError> {
        let url = format!("{}/api/v3/ticker/price", self.spot_url);
        let rows: Vec<TickerPrice> = self.http.get_json(&url, &[], &[])?;
        let tickers = parse_tickers(rows)?;
        debug!(pairs = tickers.len(), "ticker map loaded");
        Ok(tickers)
    }

    fn fetch_candles(
        &self,
        pair: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, ProviderError> {
        let url = format!("{}/api/v3/klines", self.spot_url);
        let query = [
            ("symbol", pair.to_string()),
            ("interval", interval.as_str().to_string()),
            ("limit", limit.clamp(1, MAX_KLINES).to_string()),
        ];
        let rows: Vec<Vec<Value>> = self.http.get_json(&url, &query, &[])?;
        parse_klines(&rows)
    }

    fn fetch_funding_rate(&self, pair: &str) -> Result<f64, ProviderError> {
        let url = format!("{}/fapi/v1/premiumIndex", self.futures_url);
        let index: PremiumIndex = self
            .http
            .get_json(&url, &[("symbol", pair.to_string())], &[])?;
        parse_decimal("lastFundingRate", &index.last_funding_rate)
    }
}

impl PriceLookup for BinanceProvider {
    fn current_price(&self, symbol: &str) -> Result<f64, ProviderError> {
        let url = format!("{}/api/v3/ticker/price", self.spot_url);
        let ticker: TickerPrice = self
            .http
            .get_json(&url, &[("symbol", symbol.to_string())], &[])?;
        parse_decimal("price", &ticker.price)
    }
}

/// Ticker rows to a symbol → price map. Unparseable prices are errors.
pub fn parse_tickers(rows: Vec<TickerPrice>) -> Result<TickerMap, ProviderError> {
    rows.into_iter()
        .map(|row| {
            let price = parse_decimal("price", &row.price)?;
            Ok((row.symbol, price))
        })
        .collect()
}

/// Kline rows to candles, oldest first. A bar that fails [`Candle::is_sane`]
/// rejects the whole response.
pub fn parse_klines(rows: &[Vec<Value>]) -> Result<Vec<Candle>, ProviderError> {
    let mut candles = rows
        .iter()
        .map(|row| parse_kline(row))
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(bad) = candles.iter().find(|c| !c.is_sane()) {
        return Err(ProviderError::ResponseFormatChanged(format!(
            "malformed kline at {}: high {} low {} volume {}",
            bad.open_time.timestamp_millis(),
            bad.high,
            bad.low,
            bad.volume
        )));
    }
    candles.sort_by_key(|c| c.open_time);
    Ok(candles)
}

fn parse_kline(row: &[Value]) -> Result<Candle, ProviderError> {
    if row.len() < 6 {
        return Err(ProviderError::ResponseFormatChanged(format!(
            "kline row has {} fields, expected at least 6",
            row.len()
        )));
    }
    let open_ms = row[0].as_i64().ok_or_else(|| {
        ProviderError::ResponseFormatChanged(format!("kline open time: {}", row[0]))
    })?;
    let open_time = DateTime::<Utc>::from_timestamp_millis(open_ms).ok_or_else(|| {
        ProviderError::ResponseFormatChanged(format!("kline open time out of range: {open_ms}"))
    })?;

    Ok(Candle {
        open_time,
        open: field(row, 1, "open")?,
        high: field(row, 2, "high")?,
        low: field(row, 3, "low")?,
        close: field(row, 4, "close")?,
        volume: field(row, 5, "volume")?,
    })
}

fn field(row: &[Value], index: usize, name: &str) -> Result<f64, ProviderError> {
    match &row[index] {
        Value::String(raw) => parse_decimal(name, raw),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ProviderError::ResponseFormatChanged(format!("{name}: {n}"))),
        other => Err(ProviderError::ResponseFormatChanged(format!("{name}: {other}"))),
    }
}
