//! RSI (Relative Strength Index) indicator
//!
//! RSI = 100 - (100 / (1 + RS)), RS = Wilder-smoothed gain / loss.

use crate::common::math;
use crate::models::candle::Candle;

/// Calculate an RSI series aligned to the candle index.
/// The first `period` positions are NaN.
pub fn rsi_series(candles: &[Candle], period: usize) -> Vec<f64> {
    let n = candles.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 || n < period + 1 {
        return out;
    }

    let mut gains = Vec::with_capacity(n - 1);
    let mut losses = Vec::with_capacity(n - 1);
    for i in 1..n {
        let change = candles[i].close - candles[i - 1].close;
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let avg_gain = math::wilder_series(&gains, period);
    let avg_loss = math::wilder_series(&losses, period);

    for i in 0..gains.len() {
        if avg_gain[i].is_nan() || avg_loss[i].is_nan() {
            continue;
        }
        out[i + 1] = if avg_loss[i] == 0.0 {
            100.0
        } else {
            let rs = avg_gain[i] / avg_loss[i];
            100.0 - (100.0 / (1.0 + rs))
        };
    }
    out
}
