//! Indicator library: pure functions over numeric series.
//!
//! Every function returns a series of the same length as its input, with
//! `f64::NAN` in the warmup region. Inputs shorter than the period produce
//! `IndicatorError::InsufficientData`, which callers treat as "not applicable".

pub mod bollinger;
pub mod ema;
pub mod parabolic_sar;
pub mod stats;
pub mod vwap;

pub use bollinger::{bollinger, BollingerPoint};
pub use ema::ema;
pub use parabolic_sar::{parabolic_stop, stop_flipped_above, stop_flipped_below};
pub use stats::{mean, min};
pub use vwap::vwap;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("insufficient data: need {required} values, got {provided}")]
    InsufficientData { required: usize, provided: usize },

    #[error("input series have different lengths")]
    LengthMismatch,

    #[error("invalid period: {0}")]
    InvalidPeriod(usize),
}

pub(crate) fn require_len(provided: usize, required: usize) -> Result<(), IndicatorError> {
    if provided < required {
        Err(IndicatorError::InsufficientData { required, provided })
    } else {
        Ok(())
    }
}

/// Last element of a series if it is a finite number.
pub fn last_finite(series: &[f64]) -> Option<f64> {
    series.last().copied().filter(|v| v.is_finite())
}

/// Create synthetic hourly candles from close prices for testing.
///
/// open = prev_close (or close for the first bar), high = max(open,close) + 1.0,
/// low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<crate::domain::Candle> {
    use chrono::{Duration, TimeZone, Utc};
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            crate::domain::Candle {
                open_time: base + Duration::hours(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
