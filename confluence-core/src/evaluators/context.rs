//! Evaluators driven by external context: social score, whale transfers,
//! funding rate and the market-wide fear/greed index.
//!
//! All four read optional lookups; an unavailable lookup means the rule does
//! not fire.

use super::Evaluator;
use crate::domain::{AssetContext, DestinationType, ExternalSignals, Trigger};

/// Social score above 70. The label carries the score.
#[derive(Debug, Clone, Copy)]
pub struct SocialBuzz;

impl SocialBuzz {
    pub const WEIGHT: u32 = 10;
    pub const MIN_SCORE: f64 = 70.0;
}

impl Evaluator for SocialBuzz {
    fn name(&self) -> &'static str {
        "Social: Galaxy Score"
    }

    fn weight(&self) -> u32 {
        Self::WEIGHT
    }

    fn evaluate(&self, ctx: &AssetContext, signals: &ExternalSignals) -> Option<Trigger> {
        let score = signals.social_score(&ctx.base)?;
        (score > Self::MIN_SCORE)
            .then(|| Trigger::new(format!("{} {score}", self.name()), self.weight()))
    }
}

/// A large transfer of this asset landed on an exchange.
#[derive(Debug, Clone, Copy)]
pub struct WhaleActivity;

impl WhaleActivity {
    pub const WEIGHT: u32 = 6;
}

impl Evaluator for WhaleActivity {
    fn name(&self) -> &'static str {
        "Whale Activity Detected"
    }

    fn weight(&self) -> u32 {
        Self::WEIGHT
    }

    fn evaluate(&self, ctx: &AssetContext, signals: &ExternalSignals) -> Option<Trigger> {
        signals
            .transfers_for(&ctx.base)
            .any(|event| event.destination == DestinationType::Exchange)
            .then(|| self.fired())
    }
}

/// Funding rate below -1%: shorts are paying heavily.
#[derive(Debug, Clone, Copy)]
pub struct ShortSqueeze;

impl ShortSqueeze {
    pub const WEIGHT: u32 = 8;
    pub const MAX_FUNDING: f64 = -0.01;
}

impl Evaluator for ShortSqueeze {
    fn name(&self) -> &'static str {
        "Short Squeeze potential"
    }

    fn weight(&self) -> u32 {
        Self::WEIGHT
    }

    fn evaluate(&self, ctx: &AssetContext, _signals: &ExternalSignals) -> Option<Trigger> {
        let rate = *ctx.funding_rate.available()?;
        (rate < Self::MAX_FUNDING).then(|| self.fired())
    }
}

/// Fear/greed index below 25. Fires for every asset in the scan.
#[derive(Debug, Clone, Copy)]
pub struct ExtremeFear;

impl ExtremeFear {
    pub const WEIGHT: u32 = 5;
    pub const MAX_INDEX: u8 = 25;
}

impl Evaluator for ExtremeFear {
    fn name(&self) -> &'static str {
        "Market Extreme Fear"
    }

    fn weight(&self) -> u32 {
        Self::WEIGHT
    }

    fn evaluate(&self, _ctx: &AssetContext, signals: &ExternalSignals) -> Option<Trigger> {
        let index = *signals.fear_greed.available()?;
        (index < Self::MAX_INDEX).then(|| self.fired())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Lookup, TransferEvent};
    use crate::evaluators::fixtures::quiet_context;
    use std::collections::HashMap;

    fn with_social(base: &str, score: f64) -> ExternalSignals {
        let mut scores = HashMap::new();
        scores.insert(base.to_string(), score);
        ExternalSignals {
            social_scores: Lookup::Available(scores),
            ..Default::default()
        }
    }

    #[test]
    fn social_label_includes_score() {
        let trigger = SocialBuzz
            .evaluate(&quiet_context(), &with_social("TEST", 72.5))
            .unwrap();
        assert_eq!(trigger.label, "Social: Galaxy Score 72.5");
        assert_eq!(trigger.weight, 10);

        let whole = SocialBuzz
            .evaluate(&quiet_context(), &with_social("TEST", 81.0))
            .unwrap();
        assert_eq!(whole.label, "Social: Galaxy Score 81");
    }

    #[test]
    fn social_threshold_is_strict() {
        assert!(SocialBuzz
            .evaluate(&quiet_context(), &with_social("TEST", 70.0))
            .is_none());
    }

    #[test]
    fn social_absent_for_symbol() {
        assert!(SocialBuzz
            .evaluate(&quiet_context(), &with_social("BTC", 95.0))
            .is_none());
        assert!(SocialBuzz
            .evaluate(&quiet_context(), &ExternalSignals::default())
            .is_none());
    }

    #[test]
    fn whale_needs_exchange_destination() {
        let mut signals = ExternalSignals {
            transfers: Lookup::Available(vec![TransferEvent {
                symbol: "TEST".into(),
                destination: DestinationType::Wallet,
            }]),
            ..Default::default()
        };
        assert!(WhaleActivity.evaluate(&quiet_context(), &signals).is_none());

        signals.transfers = Lookup::Available(vec![
            TransferEvent {
                symbol: "OTHER".into(),
                destination: DestinationType::Exchange,
            },
            TransferEvent {
                symbol: "test".into(),
                destination: DestinationType::Exchange,
            },
        ]);
        assert_eq!(
            WhaleActivity.evaluate(&quiet_context(), &signals),
            Some(Trigger::new("Whale Activity Detected", 6))
        );
    }

    #[test]
    fn short_squeeze_on_negative_funding() {
        let mut ctx = quiet_context();
        ctx.funding_rate = Lookup::Available(-0.02);
        assert!(ShortSqueeze.evaluate(&ctx, &ExternalSignals::default()).is_some());

        ctx.funding_rate = Lookup::Available(-0.01);
        assert!(ShortSqueeze.evaluate(&ctx, &ExternalSignals::default()).is_none());

        ctx.funding_rate = Lookup::Unavailable;
        assert!(ShortSqueeze.evaluate(&ctx, &ExternalSignals::default()).is_none());
    }

    #[test]
    fn fear_below_twenty_five() {
        let mut signals = ExternalSignals {
            fear_greed: Lookup::Available(18),
            ..Default::default()
        };
        assert_eq!(
            ExtremeFear.evaluate(&quiet_context(), &signals),
            Some(Trigger::new("Market Extreme Fear", 5))
        );
        signals.fear_greed = Lookup::Available(25);
        assert!(ExtremeFear.evaluate(&quiet_context(), &signals).is_none());
        signals.fear_greed = Lookup::Unavailable;
        assert!(ExtremeFear.evaluate(&quiet_context(), &signals).is_none());
    }
}
