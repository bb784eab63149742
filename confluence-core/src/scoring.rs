//! Scoring engine: runs every evaluator over one asset and folds the result.
//!
//! `score = Σ weight` and `triggers = [label]` over the evaluators that fire,
//! in canonical order. An evaluator that cannot compute simply does not fire;
//! only a missing candle history excludes the asset.

use rayon::prelude::*;
use thiserror::Error;

use crate::domain::{AssetContext, ExternalSignals, Interval, ScoredCandidate, Trigger};
use crate::evaluators::{Evaluator, CANONICAL_EVALUATORS};

/// Hourly bars an asset needs before it is scored at all.
pub const MIN_HOURLY_BARS: usize = 100;

/// Daily bars an asset needs before it is scored at all.
pub const MIN_DAILY_BARS: usize = 1;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoreError {
    #[error("{symbol}: {interval} history too short (need {required} bars, got {provided})")]
    InsufficientHistory {
        symbol: String,
        interval: Interval,
        required: usize,
        provided: usize,
    },

    #[error("{symbol}: no usable price ({price})")]
    InvalidPrice { symbol: String, price: f64 },
}

impl ScoreError {
    /// Venue symbol of the excluded asset.
    pub fn symbol(&self) -> &str {
        match self {
            ScoreError::InsufficientHistory { symbol, .. }
            | ScoreError::InvalidPrice { symbol, .. } => symbol,
        }
    }
}

/// Score one asset with the canonical evaluator set.
pub fn score_asset(
    ctx: &AssetContext,
    signals: &ExternalSignals,
) -> Result<ScoredCandidate, ScoreError> {
    score_with(CANONICAL_EVALUATORS, ctx, signals)
}

/// Score one asset with an explicit evaluator set.
pub fn score_with(
    evaluators: &[&dyn Evaluator],
    ctx: &AssetContext,
    signals: &ExternalSignals,
) -> Result<ScoredCandidate, ScoreError> {
    check_history(ctx)?;
    let triggers: Vec<Trigger> = evaluators
        .iter()
        .filter_map(|evaluator| evaluator.evaluate(ctx, signals))
        .collect();
    Ok(ScoredCandidate::new(ctx.symbol.clone(), triggers, ctx.price))
}

/// Score many assets in parallel. Results keep the input order.
pub fn score_all(
    contexts: &[AssetContext],
    signals: &ExternalSignals,
) -> Vec<Result<ScoredCandidate, ScoreError>> {
    contexts
        .par_iter()
        .map(|ctx| score_asset(ctx, signals))
        .collect()
}

fn check_history(ctx: &AssetContext) -> Result<(), ScoreError> {
    if ctx.hourly.len() < MIN_HOURLY_BARS {
        return Err(ScoreError::InsufficientHistory {
            symbol: ctx.symbol.clone(),
            interval: Interval::Hour1,
            required: MIN_HOURLY_BARS,
            provided: ctx.hourly.len(),
        });
    }
    if ctx.daily.len() < MIN_DAILY_BARS {
        return Err(ScoreError::InsufficientHistory {
            symbol: ctx.symbol.clone(),
            interval: Interval::Day1,
            required: MIN_DAILY_BARS,
            provided: ctx.daily.len(),
        });
    }
    if !ctx.price.is_finite() || ctx.price <= 0.0 {
        return Err(ScoreError::InvalidPrice {
            symbol: ctx.symbol.clone(),
            price: ctx.price,
        });
    }
    Ok(())
}
