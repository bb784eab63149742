//! Price-pattern evaluators: rounding bottom, higher lows, gapper, unit bias.

use super::Evaluator;
use crate::domain::{candle, AssetContext, ExternalSignals, Trigger, DAILY_WINDOW};
use crate::indicators::min;

/// Daily closes dip in the middle of the window and recover at both ends.
///
/// Over the newest 30 daily bars (index 0 oldest): the minimum close of
/// bars 10..=19 is below both the close of bar 0 and the close of bar 29.
#[derive(Debug, Clone, Copy)]
pub struct RoundingBottom;

impl RoundingBottom {
    pub const WEIGHT: u32 = 5;
    pub const TROUGH_START: usize = 10;
    pub const TROUGH_END: usize = 19;
}

impl Evaluator for RoundingBottom {
    fn name(&self) -> &'static str {
        "Rounding Bottom"
    }

    fn weight(&self) -> u32 {
        Self::WEIGHT
    }

    fn evaluate(&self, ctx: &AssetContext, _signals: &ExternalSignals) -> Option<Trigger> {
        if ctx.daily.len() < DAILY_WINDOW {
            return None;
        }
        let window = candle::closes(&ctx.daily[ctx.daily.len() - DAILY_WINDOW..]);
        let trough = min(&window[Self::TROUGH_START..=Self::TROUGH_END])?;
        let (first, last) = (window[0], window[DAILY_WINDOW - 1]);
        (trough < first && trough < last).then(|| self.fired())
    }
}

/// Three consecutive rising hourly lows.
#[derive(Debug, Clone, Copy)]
pub struct HigherLows;

impl HigherLows {
    pub const WEIGHT: u32 = 4;
}

impl Evaluator for HigherLows {
    fn name(&self) -> &'static str {
        "Higher Lows (Triangle)"
    }

    fn weight(&self) -> u32 {
        Self::WEIGHT
    }

    fn evaluate(&self, ctx: &AssetContext, _signals: &ExternalSignals) -> Option<Trigger> {
        let n = ctx.hourly.len();
        if n < 3 {
            return None;
        }
        let (l3, l2, l1) = (
            ctx.hourly[n - 3].low,
            ctx.hourly[n - 2].low,
            ctx.hourly[n - 1].low,
        );
        (l1 > l2 && l2 > l3).then(|| self.fired())
    }
}

/// Last hourly close at least 3% above the newest daily open.
#[derive(Debug, Clone, Copy)]
pub struct GapperContinuation;

impl GapperContinuation {
    pub const WEIGHT: u32 = 4;
    pub const MIN_GAP: f64 = 0.03;
}

impl Evaluator for GapperContinuation {
    fn name(&self) -> &'static str {
        "Gapper Continuation"
    }

    fn weight(&self) -> u32 {
        Self::WEIGHT
    }

    fn evaluate(&self, ctx: &AssetContext, _signals: &ExternalSignals) -> Option<Trigger> {
        let daily_open = ctx.daily.last()?.open;
        let last_close = ctx.hourly.last()?.close;
        if daily_open.is_nan() || daily_open <= 0.0 || !last_close.is_finite() {
            return None;
        }
        let gap = (last_close - daily_open) / daily_open;
        (gap >= Self::MIN_GAP).then(|| self.fired())
    }
}

/// Sub-cent price.
#[derive(Debug, Clone, Copy)]
pub struct UnitBias;

impl UnitBias {
    pub const WEIGHT: u32 = 2;
    pub const MAX_PRICE: f64 = 0.01;
}

impl Evaluator for UnitBias {
    fn name(&self) -> &'static str {
        "Unit Bias"
    }

    fn weight(&self) -> u32 {
        Self::WEIGHT
    }

    fn evaluate(&self, ctx: &AssetContext, _signals: &ExternalSignals) -> Option<Trigger> {
        (ctx.price > 0.0 && ctx.price < Self::MAX_PRICE).then(|| self.fired())
    }
}
