//! Parabolic SAR: Wilder's acceleration factor system.
//!
//! Inherently sequential/stateful: maintains direction, extreme point (EP),
//! and acceleration factor (AF). Starts long at bar 0 with stop = low[0] and
//! EP = high[0]; the AF starts at `step`, grows by `step` on each new extreme
//! and is capped at `max`.
//! Lookback: needs at least 2 bars.

use super::{require_len, IndicatorError};

/// Default acceleration step.
pub const DEFAULT_STEP: f64 = 0.02;

/// Default acceleration cap.
pub const DEFAULT_MAX: f64 = 0.20;

pub fn parabolic_stop(
    highs: &[f64],
    lows: &[f64],
    step: f64,
    max: f64,
) -> Result<Vec<f64>, IndicatorError> {
    if highs.len() != lows.len() {
        return Err(IndicatorError::LengthMismatch);
    }
    require_len(highs.len(), 2)?;

    let n = highs.len();
    let mut result = vec![f64::NAN; n];

    if highs[0].is_nan() || lows[0].is_nan() {
        return Ok(result);
    }

    let mut is_long = true;
    let mut af = step;
    let mut ep = highs[0];
    let mut sar = lows[0];
    result[0] = sar;

    for i in 1..n {
        if highs[i].is_nan() || lows[i].is_nan() {
            continue;
        }

        let mut next = sar + af * (ep - sar);

        if is_long {
            // Stop may not sit above the two previous lows.
            next = next.min(lows[i - 1]);
            if i >= 2 {
                next = next.min(lows[i - 2]);
            }

            if lows[i] < next {
                is_long = false;
                next = ep;
                ep = lows[i];
                af = step;
            } else if highs[i] > ep {
                ep = highs[i];
                af = (af + step).min(max);
            }
        } else {
            // Stop may not sit below the two previous highs.
            next = next.max(highs[i - 1]);
            if i >= 2 {
                next = next.max(highs[i - 2]);
            }

            if highs[i] > next {
                is_long = true;
                next = ep;
                ep = highs[i];
                af = step;
            } else if lows[i] < ep {
                ep = lows[i];
                af = (af + step).min(max);
            }
        }

        sar = next;
        result[i] = sar;
    }

    Ok(result)
}

/// True when the stop was above price on the second-to-last bar and below
/// price on the last bar (a bullish flip).
pub fn stop_flipped_below(stops: &[f64], closes: &[f64]) -> bool {
    last_two(stops, closes).is_some_and(|[prev_stop, last_stop, prev_close, last_close]| {
        prev_stop > prev_close && last_stop < last_close
    })
}

/// Bearish counterpart of [`stop_flipped_below`]: stop below price on the
/// second-to-last bar, above it on the last.
pub fn stop_flipped_above(stops: &[f64], closes: &[f64]) -> bool {
    last_two(stops, closes).is_some_and(|[prev_stop, last_stop, prev_close, last_close]| {
        prev_stop < prev_close && last_stop > last_close
    })
}

/// `[prev_stop, last_stop, prev_close, last_close]`, all finite.
fn last_two(stops: &[f64], closes: &[f64]) -> Option<[f64; 4]> {
    let n = stops.len();
    if n < 2 || closes.len() != n {
        return None;
    }
    let values = [stops[n - 2], stops[n - 1], closes[n - 2], closes[n - 1]];
    values.iter().all(|v| v.is_finite()).then_some(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn split(data: &[(f64, f64, f64)]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (
            data.iter().map(|d| d.0).collect(),
            data.iter().map(|d| d.1).collect(),
            data.iter().map(|d| d.2).collect(),
        )
    }

    /// (high, low, close): a slide that reverses sharply on the last bar.
    const REVERSAL: [(f64, f64, f64); 5] = [
        (105.0, 98.0, 100.0),
        (103.0, 95.0, 96.0),
        (99.0, 90.0, 91.0),
        (94.0, 86.0, 87.0),
        (110.0, 88.0, 109.0),
    ];

    #[test]
    fn known_values_through_reversal() {
        let (highs, lows, _) = split(&REVERSAL);
        let stops = parabolic_stop(&highs, &lows, DEFAULT_STEP, DEFAULT_MAX).unwrap();
        assert_approx(stops[0], 98.0, DEFAULT_EPSILON);
        // Bar 1 breaks below the long stop → short, stop jumps to EP 105.
        assert_approx(stops[1], 105.0, DEFAULT_EPSILON);
        assert_approx(stops[2], 105.0, DEFAULT_EPSILON);
        assert_approx(stops[3], 104.4, 1e-9);
        // Bar 4 breaks above the short stop → long, stop drops to EP 86.
        assert_approx(stops[4], 86.0, DEFAULT_EPSILON);
    }

    #[test]
    fn flip_detected_on_last_bar() {
        let (highs, lows, closes) = split(&REVERSAL);
        let stops = parabolic_stop(&highs, &lows, DEFAULT_STEP, DEFAULT_MAX).unwrap();
        assert!(stop_flipped_below(&stops, &closes));
        // One bar earlier the stop was above price on both bars.
        assert!(!stop_flipped_below(&stops[..4], &closes[..4]));
        assert!(!stop_flipped_above(&stops, &closes));
    }

    #[test]
    fn bearish_flip_when_long_stop_is_broken() {
        let (highs, lows, closes) = split(&REVERSAL);
        let stops = parabolic_stop(&highs, &lows, DEFAULT_STEP, DEFAULT_MAX).unwrap();
        // Bar 0 long with stop 98 under close 100; bar 1 short with stop 105 over close 96.
        assert!(stop_flipped_above(&stops[..2], &closes[..2]));
        assert!(!stop_flipped_below(&stops[..2], &closes[..2]));
        assert!(!stop_flipped_above(&stops[..3], &closes[..3]));
    }

    #[test]
    fn uptrend_stop_below_price() {
        let data: Vec<(f64, f64, f64)> = (0..10)
            .map(|i| {
                let base = 100.0 + i as f64 * 3.0;
                (base + 2.0, base - 1.0, base + 1.5)
            })
            .collect();
        let (highs, lows, _) = split(&data);
        let stops = parabolic_stop(&highs, &lows, DEFAULT_STEP, DEFAULT_MAX).unwrap();
        for i in 1..10 {
            assert!(stops[i] < lows[i], "stop {} above low {} at bar {i}", stops[i], lows[i]);
        }
    }

    #[test]
    fn downtrend_never_flips() {
        let data: Vec<(f64, f64, f64)> = (0..30)
            .map(|i| {
                let base = 200.0 - i as f64 * 2.0;
                (base + 0.5, base - 0.5, base)
            })
            .collect();
        let (highs, lows, closes) = split(&data);
        let stops = parabolic_stop(&highs, &lows, DEFAULT_STEP, DEFAULT_MAX).unwrap();
        for i in 2..30 {
            assert!(stops[i] > closes[i]);
        }
        assert!(!stop_flipped_below(&stops, &closes));
        assert!(!stop_flipped_above(&stops, &closes));
    }

    #[test]
    fn too_few_bars() {
        assert!(matches!(
            parabolic_stop(&[1.0], &[0.5], DEFAULT_STEP, DEFAULT_MAX),
            Err(IndicatorError::InsufficientData { required: 2, provided: 1 })
        ));
    }

    #[test]
    fn mismatched_lengths() {
        assert_eq!(
            parabolic_stop(&[1.0, 2.0], &[0.5], DEFAULT_STEP, DEFAULT_MAX),
            Err(IndicatorError::LengthMismatch)
        );
    }
}
