//! ATR (Average True Range) indicator
//!
//! ATR is the Wilder-smoothed average of the true range, a volatility
//! measure used here to size targets and stops.

use crate::common::math;
use crate::models::candle::Candle;

/// Calculate an ATR series aligned to the candle index.
/// The first `period` positions are NaN.
pub fn atr_series(candles: &[Candle], period: usize) -> Vec<f64> {
    let n = candles.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 || n < period + 1 {
        return out;
    }

    let mut tr = Vec::with_capacity(n - 1);
    for i in 1..n {
        tr.push(math::true_range(
            candles[i].high,
            candles[i].low,
            candles[i - 1].close,
        ));
    }

    let smoothed = math::wilder_series(&tr, period);
    for (i, value) in smoothed.into_iter().enumerate() {
        out[i + 1] = value;
    }
    out
}
