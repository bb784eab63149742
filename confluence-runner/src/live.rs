//! Wires real HTTP-backed collaborators from an [`AppConfig`].
//!
//! Each upstream host gets its own [`HttpClient`], and with it its own
//! circuit breaker. Keyed sources are only built when their key is set.

use chrono::Duration as ChronoDuration;
use std::time::Duration;
use tracing::info;

use confluence_core::data::{
    AlternativeMeSource, BinanceProvider, CoinGeckoSource, FearGreedSource, HttpClient,
    LunarCrushSource, ProviderError, SentimentSource, TransferFeed, WhaleAlertFeed,
};

use crate::config::{env_secret, AppConfig, ProvidersConfig};
use crate::notify::{FanoutSink, StdoutSink, WebhookSink};
use crate::scan::{CycleOptions, ScanCycle, ScanOptions};
use crate::store::JsonFileStore;

const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

impl From<&AppConfig> for CycleOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            universe_size: config.scan.universe_size,
            transfer_window: ChronoDuration::hours(i64::from(config.scan.whale_window_hours)),
            scan: ScanOptions {
                hourly_limit: config.scan.hourly_limit,
                daily_limit: config.scan.daily_limit,
                request_delay: config.scan.request_delay(),
                quote_currencies: config
                    .scan
                    .quote_currencies
                    .iter()
                    .map(|q| q.trim().to_uppercase())
                    .filter(|q| !q.is_empty())
                    .collect(),
            },
        }
    }
}

/// Owned set of live collaborators. Borrow a [`ScanCycle`] from it per run.
pub struct LiveServices {
    pub market: BinanceProvider,
    pub universe: CoinGeckoSource,
    pub sentiment: Option<LunarCrushSource>,
    pub transfers: Option<WhaleAlertFeed>,
    pub fear_greed: AlternativeMeSource,
    pub store: JsonFileStore,
    pub sink: FanoutSink,
}

impl LiveServices {
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let providers = &config.providers;

        let market = BinanceProvider::new(
            client("binance", providers)?,
            &providers.binance_spot_url,
            &providers.binance_futures_url,
        );
        let universe = CoinGeckoSource::new(
            client("coingecko", providers)?,
            &providers.coingecko_url,
            env_secret(&providers.coingecko_key_env),
        );

        let sentiment = match env_secret(&providers.lunarcrush_key_env) {
            Some(key) => Some(LunarCrushSource::new(
                client("lunarcrush", providers)?,
                &providers.lunarcrush_url,
                key,
            )),
            None => {
                info!(env = %providers.lunarcrush_key_env, "social scores disabled, key not set");
                None
            }
        };
        let transfers = match env_secret(&providers.whale_alert_key_env) {
            Some(key) => Some(WhaleAlertFeed::new(
                client("whale-alert", providers)?,
                &providers.whale_alert_url,
                key,
                config.scan.whale_min_value_usd,
            )),
            None => {
                info!(env = %providers.whale_alert_key_env, "transfer feed disabled, key not set");
                None
            }
        };
        let fear_greed = AlternativeMeSource::new(
            client("alternative.me", providers)?,
            &providers.fear_greed_url,
        );

        let mut sink = FanoutSink::default();
        if config.notify.stdout {
            sink.push(Box::new(StdoutSink));
        }
        if let Some(url) = env_secret(&config.notify.webhook_url_env) {
            sink.push(Box::new(WebhookSink::new(client("webhook", providers)?, url)));
        }

        Ok(Self {
            market,
            universe,
            sentiment,
            transfers,
            fear_greed,
            store: JsonFileStore::new(&config.store.selection_path),
            sink,
        })
    }

    pub fn scan_cycle(&self) -> ScanCycle<'_> {
        ScanCycle {
            market: &self.market,
            universe: &self.universe,
            sentiment: self.sentiment.as_ref().map(|s| s as &dyn SentimentSource),
            transfers: self.transfers.as_ref().map(|t| t as &dyn TransferFeed),
            fear_greed: Some(&self.fear_greed as &dyn FearGreedSource),
            store: &self.store,
            sink: &self.sink,
        }
    }
}

fn client(host: &str, providers: &ProvidersConfig) -> Result<HttpClient, ProviderError> {
    Ok(HttpClient::new(host, providers.http_timeout())?
        .with_retries(providers.max_retries, RETRY_BASE_DELAY))
}
