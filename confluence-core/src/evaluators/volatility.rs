//! Volatility and mean evaluators: squeeze, oversold reversion, VWAP bounce.

use super::Evaluator;
use crate::domain::{candle, AssetContext, ExternalSignals, Trigger};
use crate::indicators::{bollinger, last_finite, mean, vwap};

/// Bollinger band width below 3% of the middle band.
#[derive(Debug, Clone, Copy)]
pub struct VolatilitySqueeze;

impl VolatilitySqueeze {
    pub const WEIGHT: u32 = 7;
    pub const PERIOD: usize = 20;
    pub const MULTIPLIER: f64 = 2.0;
    pub const MAX_WIDTH: f64 = 0.03;
}

impl Evaluator for VolatilitySqueeze {
    fn name(&self) -> &'static str {
        "Volatility Squeeze"
    }

    fn weight(&self) -> u32 {
        Self::WEIGHT
    }

    fn evaluate(&self, ctx: &AssetContext, _signals: &ExternalSignals) -> Option<Trigger> {
        let closes = candle::closes(&ctx.hourly);
        let bands = bollinger(&closes, Self::PERIOD, Self::MULTIPLIER).ok()?;
        let width = bands.last()?.width_ratio();
        (width.is_finite() && width < Self::MAX_WIDTH).then(|| self.fired())
    }
}

/// Last hourly close more than 12% below the window's mean close.
#[derive(Debug, Clone, Copy)]
pub struct MeanReversion;

impl MeanReversion {
    pub const WEIGHT: u32 = 8;
    pub const DISCOUNT: f64 = 0.88;
}

impl Evaluator for MeanReversion {
    fn name(&self) -> &'static str {
        "Mean Reversion (Oversold)"
    }

    fn weight(&self) -> u32 {
        Self::WEIGHT
    }

    fn evaluate(&self, ctx: &AssetContext, _signals: &ExternalSignals) -> Option<Trigger> {
        let closes = candle::closes(&ctx.hourly);
        let last = last_finite(&closes)?;
        let average = mean(&closes)?;
        (last < Self::DISCOUNT * average).then(|| self.fired())
    }
}

/// Last bar dipped to VWAP and closed above it.
#[derive(Debug, Clone, Copy)]
pub struct VwapBounce;

impl VwapBounce {
    pub const WEIGHT: u32 = 4;
}

impl Evaluator for VwapBounce {
    fn name(&self) -> &'static str {
        "VWAP Bounce"
    }

    fn weight(&self) -> u32 {
        Self::WEIGHT
    }

    fn evaluate(&self, ctx: &AssetContext, _signals: &ExternalSignals) -> Option<Trigger> {
        let series = vwap(
            &candle::highs(&ctx.hourly),
            &candle::lows(&ctx.hourly),
            &candle::closes(&ctx.hourly),
            &candle::volumes(&ctx.hourly),
        )
        .ok()?;
        let level = last_finite(&series)?;
        let last = ctx.hourly.last()?;
        (last.close > level && last.low <= level).then(|| self.fired())
    }
}
