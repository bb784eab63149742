//! Scan-scoped external context shared read-only across all assets.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Result of an optional external lookup.
///
/// Collaborators that fail or time out produce `Unavailable` instead of an
/// error, so evaluators stay total functions and simply do not fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Lookup<T> {
    Available(T),
    Unavailable,
}

impl<T> Lookup<T> {
    pub fn available(&self) -> Option<&T> {
        match self {
            Lookup::Available(value) => Some(value),
            Lookup::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Lookup::Available(_))
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Lookup::Available(v),
            None => Lookup::Unavailable,
        }
    }
}

impl<T> Default for Lookup<T> {
    fn default() -> Self {
        Lookup::Unavailable
    }
}

/// Where a large transfer landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestinationType {
    Exchange,
    Wallet,
    Unknown,
}

impl DestinationType {
    /// Classify a feed's owner-type string (`"exchange"`, `"unknown"`, ...).
    pub fn classify(owner_type: &str) -> Self {
        match owner_type.trim().to_ascii_lowercase().as_str() {
            "exchange" => DestinationType::Exchange,
            "" | "unknown" => DestinationType::Unknown,
            _ => DestinationType::Wallet,
        }
    }
}

/// A single large-value transfer observed during the scan window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferEvent {
    /// Upper-case base asset identifier.
    pub symbol: String,
    pub destination: DestinationType,
}

/// Context gathered once at the start of a scan and discarded at its end.
#[derive(Debug, Clone, Default)]
pub struct ExternalSignals {
    /// Upper-case base identifiers of stable-value assets.
    pub stablecoins: HashSet<String>,
    /// Base identifier → social score (0-100).
    pub social_scores: Lookup<HashMap<String, f64>>,
    pub transfers: Lookup<Vec<TransferEvent>>,
    /// Fear/greed index, 0 (extreme fear) to 100 (extreme greed).
    pub fear_greed: Lookup<u8>,
}

impl ExternalSignals {
    pub fn is_stable(&self, base: &str) -> bool {
        self.stablecoins.contains(&base.to_uppercase())
    }

    /// Social score for a base asset.
    pub fn social_score(&self, base: &str) -> Option<f64> {
        self.social_scores
            .available()?
            .get(&base.to_uppercase())
            .copied()
    }

    /// Transfer events recorded for a base asset.
    pub fn transfers_for<'a>(
        &'a self,
        base: &'a str,
    ) -> impl Iterator<Item = &'a TransferEvent> + 'a {
        self.transfers
            .available()
            .into_iter()
            .flatten()
            .filter(move |event| event.symbol.eq_ignore_ascii_case(base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_from_option() {
        assert_eq!(Lookup::from(Some(3)), Lookup::Available(3));
        assert_eq!(Lookup::<u8>::from(None), Lookup::Unavailable);
        assert!(!Lookup::<u8>::default().is_available());
    }

    #[test]
    fn destination_classification() {
        assert_eq!(DestinationType::classify("exchange"), DestinationType::Exchange);
        assert_eq!(DestinationType::classify("Exchange "), DestinationType::Exchange);
        assert_eq!(DestinationType::classify("unknown"), DestinationType::Unknown);
        assert_eq!(DestinationType::classify("other"), DestinationType::Wallet);
    }

    #[test]
    fn social_score_matches_base_exactly() {
        let mut scores = HashMap::new();
        scores.insert("ETH".to_string(), 81.0);
        let signals = ExternalSignals {
            social_scores: Lookup::Available(scores),
            ..Default::default()
        };
        assert_eq!(signals.social_score("eth"), Some(81.0));
        assert_eq!(signals.social_score("ETHFI"), None);
    }

    #[test]
    fn transfers_match_base_ignoring_case() {
        let signals = ExternalSignals {
            transfers: Lookup::Available(vec![
                TransferEvent { symbol: "btc".into(), destination: DestinationType::Exchange },
                TransferEvent { symbol: "ETH".into(), destination: DestinationType::Wallet },
            ]),
            ..Default::default()
        };
        assert_eq!(signals.transfers_for("BTC").count(), 1);
        assert_eq!(signals.transfers_for("SOL").count(), 0);
    }

    #[test]
    fn transfers_unavailable_yield_nothing() {
        let signals = ExternalSignals::default();
        assert_eq!(signals.transfers_for("BTC").count(), 0);
    }

    #[test]
    fn stable_check_is_case_insensitive() {
        let signals = ExternalSignals {
            stablecoins: ["USDT".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert!(signals.is_stable("usdt"));
        assert!(!signals.is_stable("BTC"));
    }
}
