//! External collaborators: traits, the shared HTTP client, and one module per service.

pub mod binance;
pub mod circuit_breaker;
pub mod coingecko;
pub mod fear_greed;
pub mod http;
pub mod lunarcrush;
pub mod provider;
pub mod whale_alert;

pub use binance::BinanceProvider;
pub use circuit_breaker::{BreakerState, CircuitBreaker};
pub use coingecko::CoinGeckoSource;
pub use fear_greed::AlternativeMeSource;
pub use http::HttpClient;
pub use lunarcrush::LunarCrushSource;
pub use provider::{
    FearGreedSource, MarketDataProvider, PriceLookup, ProviderError, SentimentSource, TickerMap,
    TransferFeed, UniverseSource,
};
pub use whale_alert::WhaleAlertFeed;
