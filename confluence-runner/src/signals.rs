//! Gathers the scan-wide [`ExternalSignals`] snapshot.
//!
//! Every source is optional and best-effort: a missing or failing source
//! leaves its lookup `Unavailable` and the scan carries on. Stablecoins fall
//! back to [`DEFAULT_STABLECOINS`].

use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use tracing::{info, warn};

use confluence_core::data::{FearGreedSource, SentimentSource, TransferFeed, UniverseSource};
use confluence_core::domain::{ExternalSignals, Lookup};

/// Stable-value assets excluded when the universe source cannot list them.
pub const DEFAULT_STABLECOINS: &[&str] = &[
    "USDT", "USDC", "DAI", "BUSD", "TUSD", "USDP", "FDUSD", "USDD", "PYUSD", "USDE", "FRAX", "GUSD",
];

#[derive(Clone, Copy, Default)]
pub struct SignalSources<'a> {
    pub universe: Option<&'a dyn UniverseSource>,
    pub sentiment: Option<&'a dyn SentimentSource>,
    pub transfers: Option<&'a dyn TransferFeed>,
    pub fear_greed: Option<&'a dyn FearGreedSource>,
}

pub fn default_stablecoins() -> HashSet<String> {
    DEFAULT_STABLECOINS.iter().map(|s| s.to_string()).collect()
}

/// Build the snapshot for one scan. `transfer_window` bounds how far back
/// transfers are fetched from `now`.
pub fn gather_signals(
    sources: &SignalSources<'_>,
    now: DateTime<Utc>,
    transfer_window: Duration,
) -> ExternalSignals {
    let stablecoins = match sources.universe.map(|u| u.stablecoins()) {
        Some(Ok(set)) if !set.is_empty() => set.into_iter().map(|s| s.to_uppercase()).collect(),
        Some(Ok(_)) => {
            warn!("stablecoin list empty, using defaults");
            default_stablecoins()
        }
        Some(Err(e)) => {
            warn!(error = %e, "stablecoin list unavailable, using defaults");
            default_stablecoins()
        }
        None => default_stablecoins(),
    };

    let social_scores = lookup("social scores", sources.sentiment.map(|s| s.social_scores()));
    let transfers = lookup(
        "transfer feed",
        sources
            .transfers
            .map(|t| t.recent_transfers(now - transfer_window)),
    );
    let fear_greed = lookup("fear/greed index", sources.fear_greed.map(|f| f.index()));

    info!(
        stablecoins = stablecoins.len(),
        social = social_scores.is_available(),
        transfers = transfers.is_available(),
        fear_greed = ?fear_greed.available(),
        "external signals gathered"
    );

    ExternalSignals {
        stablecoins,
        social_scores,
        transfers,
        fear_greed,
    }
}

fn lookup<T, E: std::fmt::Display>(what: &str, result: Option<Result<T, E>>) -> Lookup<T> {
    match result {
        Some(Ok(value)) => Lookup::Available(value),
        Some(Err(e)) => {
            warn!(source = what, error = %e, "signal source unavailable");
            Lookup::Unavailable
        }
        None => {
            info!(source = what, "signal source not configured");
            Lookup::Unavailable
        }
    }
}
