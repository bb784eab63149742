//! Trend evaluators on hourly bars: parabolic stop flip and EMA cross.

use super::Evaluator;
use crate::domain::{candle, AssetContext, ExternalSignals, Trigger};
use crate::indicators::parabolic_sar::{DEFAULT_MAX, DEFAULT_STEP};
use crate::indicators::{ema, last_finite, parabolic_stop, stop_flipped_below};

/// Parabolic stop moved from above price to below price on the last bar.
#[derive(Debug, Clone, Copy)]
pub struct PsarFlip;

impl PsarFlip {
    pub const WEIGHT: u32 = 6;
}

impl Evaluator for PsarFlip {
    fn name(&self) -> &'static str {
        "PSAR Flip"
    }

    fn weight(&self) -> u32 {
        Self::WEIGHT
    }

    fn evaluate(&self, ctx: &AssetContext, _signals: &ExternalSignals) -> Option<Trigger> {
        let highs = candle::highs(&ctx.hourly);
        let lows = candle::lows(&ctx.hourly);
        let closes = candle::closes(&ctx.hourly);
        let stops = parabolic_stop(&highs, &lows, DEFAULT_STEP, DEFAULT_MAX).ok()?;
        stop_flipped_below(&stops, &closes).then(|| self.fired())
    }
}

/// Fast EMA above slow EMA on the last hourly bar.
#[derive(Debug, Clone, Copy)]
pub struct EmaCross;

impl EmaCross {
    pub const WEIGHT: u32 = 3;
    pub const FAST: usize = 10;
    pub const SLOW: usize = 20;
}

impl Evaluator for EmaCross {
    fn name(&self) -> &'static str {
        "EMA Cross"
    }

    fn weight(&self) -> u32 {
        Self::WEIGHT
    }

    fn evaluate(&self, ctx: &AssetContext, _signals: &ExternalSignals) -> Option<Trigger> {
        let closes = candle::closes(&ctx.hourly);
        let fast = last_finite(&ema(&closes, Self::FAST).ok()?)?;
        let slow = last_finite(&ema(&closes, Self::SLOW).ok()?)?;
        (fast > slow).then(|| self.fired())
    }
}
