//! Application configuration, loaded from TOML.
//!
//! Every section is `#[serde(default)]`, so a file only needs the keys it
//! changes. Secrets never live in the file: it names the environment
//! variables that hold them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use confluence_core::data::{binance, coingecko, fear_greed, lunarcrush, whale_alert};
use confluence_core::domain::{DAILY_WINDOW, HOURLY_WINDOW};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub providers: ProvidersConfig,
    pub store: StoreConfig,
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Number of market-cap ranked assets considered per scan.
    pub universe_size: usize,
    pub hourly_limit: usize,
    pub daily_limit: usize,
    /// Pause between assets, in milliseconds.
    pub request_delay_ms: u64,
    /// Quote currencies tried, in order, when resolving a venue pair.
    pub quote_currencies: Vec<String>,
    /// How far back the large-transfer feed is queried.
    pub whale_window_hours: u32,
    pub whale_min_value_usd: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            universe_size: 100,
            hourly_limit: HOURLY_WINDOW,
            daily_limit: DAILY_WINDOW,
            request_delay_ms: 250,
            quote_currencies: vec!["USDT".into(), "USDC".into()],
            whale_window_hours: 24,
            whale_min_value_usd: whale_alert::DEFAULT_MIN_VALUE_USD,
        }
    }
}

impl ScanConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub binance_spot_url: String,
    pub binance_futures_url: String,
    pub coingecko_url: String,
    pub lunarcrush_url: String,
    pub whale_alert_url: String,
    pub fear_greed_url: String,
    pub http_timeout_secs: u64,
    pub max_retries: u32,
    /// Environment variable holding the CoinGecko key (optional for the public tier).
    pub coingecko_key_env: String,
    /// Environment variable holding the LunarCrush key. Unset disables social scores.
    pub lunarcrush_key_env: String,
    /// Environment variable holding the Whale Alert key. Unset disables transfer events.
    pub whale_alert_key_env: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            binance_spot_url: binance::DEFAULT_SPOT_URL.into(),
            binance_futures_url: binance::DEFAULT_FUTURES_URL.into(),
            coingecko_url: coingecko::DEFAULT_URL.into(),
            lunarcrush_url: lunarcrush::DEFAULT_URL.into(),
            whale_alert_url: whale_alert::DEFAULT_URL.into(),
            fear_greed_url: fear_greed::DEFAULT_URL.into(),
            http_timeout_secs: 15,
            max_retries: 3,
            coingecko_key_env: "COINGECKO_API_KEY".into(),
            lunarcrush_key_env: "LUNARCRUSH_API_KEY".into(),
            whale_alert_key_env: "WHALE_ALERT_API_KEY".into(),
        }
    }
}

impl ProvidersConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub selection_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            selection_path: PathBuf::from("confluence-selection.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Print messages to stdout.
    pub stdout: bool,
    /// Environment variable holding a chat webhook URL. Unset disables the webhook.
    pub webhook_url_env: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            stdout: true,
            webhook_url_env: "CONFLUENCE_WEBHOOK_URL".into(),
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let scan = &self.scan;
        if scan.universe_size == 0 {
            return Err(ConfigError::Invalid("scan.universe_size must be at least 1".into()));
        }
        if scan.hourly_limit < HOURLY_WINDOW {
            return Err(ConfigError::Invalid(format!(
                "scan.hourly_limit must be at least {HOURLY_WINDOW}, got {}",
                scan.hourly_limit
            )));
        }
        if scan.daily_limit < DAILY_WINDOW {
            return Err(ConfigError::Invalid(format!(
                "scan.daily_limit must be at least {DAILY_WINDOW}, got {}",
                scan.daily_limit
            )));
        }
        if scan.quote_currencies.iter().all(|q| q.trim().is_empty()) {
            return Err(ConfigError::Invalid("scan.quote_currencies is empty".into()));
        }
        if self.providers.http_timeout_secs == 0 {
            return Err(ConfigError::Invalid("providers.http_timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

/// Non-empty value of an environment variable.
pub fn env_secret(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
