//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! - Middle: SMA(values, period)
//! - Upper: middle + mult * stddev(values, period)
//! - Lower: middle - mult * stddev(values, period)
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1.

use super::{require_len, IndicatorError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerPoint {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerPoint {
    const WARMUP: Self = Self {
        upper: f64::NAN,
        middle: f64::NAN,
        lower: f64::NAN,
    };

    /// Band width relative to the middle band: `(upper - lower) / middle`.
    pub fn width_ratio(&self) -> f64 {
        (self.upper - self.lower) / self.middle
    }
}

pub fn bollinger(
    values: &[f64],
    period: usize,
    multiplier: f64,
) -> Result<Vec<BollingerPoint>, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod(period));
    }
    require_len(values.len(), period)?;

    let n = values.len();
    let mut result = vec![BollingerPoint::WARMUP; n];

    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }

        let mean = window.iter().sum::<f64>() / period as f64;
        let variance = window
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let stddev = variance.sqrt();

        result[i] = BollingerPoint {
            upper: mean + multiplier * stddev,
            middle: mean,
            lower: mean - multiplier * stddev,
        };
    }

    Ok(result)
}
