//! Volume-weighted average price, cumulative from the first bar.
//!
//! VWAP[t] = sum(typical[0..=t] * volume[0..=t]) / sum(volume[0..=t])
//! with typical = (high + low + close) / 3. Bars before any volume is seen are NaN.

use super::{require_len, IndicatorError};

pub fn vwap(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    volumes: &[f64],
) -> Result<Vec<f64>, IndicatorError> {
    let n = highs.len();
    if lows.len() != n || closes.len() != n || volumes.len() != n {
        return Err(IndicatorError::LengthMismatch);
    }
    require_len(n, 1)?;

    let mut result = vec![f64::NAN; n];
    let mut price_volume = 0.0;
    let mut volume = 0.0;

    for i in 0..n {
        let typical = (highs[i] + lows[i] + closes[i]) / 3.0;
        if typical.is_nan() || volumes[i].is_nan() {
            continue;
        }
        price_volume += typical * volumes[i];
        volume += volumes[i];
        if volume > 0.0 {
            result[i] = price_volume / volume;
        }
    }

    Ok(result)
}
