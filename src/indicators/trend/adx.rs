//! ADX (Average Directional Index) indicator
//!
//! ADX measures trend strength regardless of direction. The directional
//! movements and true range are Wilder-smoothed, DX is derived from the
//! +DI/-DI spread, and ADX is a second Wilder smoothing of DX.

use crate::common::math;
use crate::models::candle::Candle;

/// Calculate an ADX series aligned to the candle index.
/// The first `2 * period` positions are NaN while the smoothing seeds.
pub fn adx_series(candles: &[Candle], period: usize) -> Vec<f64> {
    let n = candles.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 || n < 2 * period + 1 {
        return out;
    }

    let mut tr = Vec::with_capacity(n - 1);
    let mut plus_dm = Vec::with_capacity(n - 1);
    let mut minus_dm = Vec::with_capacity(n - 1);
    for i in 1..n {
        tr.push(math::true_range(
            candles[i].high,
            candles[i].low,
            candles[i - 1].close,
        ));
        let up = candles[i].high - candles[i - 1].high;
        let down = candles[i - 1].low - candles[i].low;
        plus_dm.push(if up > down && up > 0.0 { up } else { 0.0 });
        minus_dm.push(if down > up && down > 0.0 { down } else { 0.0 });
    }

    let tr_smooth = math::wilder_series(&tr, period);
    let plus_smooth = math::wilder_series(&plus_dm, period);
    let minus_smooth = math::wilder_series(&minus_dm, period);

    let mut dx = vec![f64::NAN; tr.len()];
    for i in 0..tr.len() {
        if tr_smooth[i].is_nan() || tr_smooth[i] <= 0.0 {
            continue;
        }
        let plus_di = 100.0 * plus_smooth[i] / tr_smooth[i];
        let minus_di = 100.0 * minus_smooth[i] / tr_smooth[i];
        let di_sum = plus_di + minus_di;
        if di_sum > 0.0 {
            dx[i] = 100.0 * (plus_di - minus_di).abs() / di_sum;
        } else {
            dx[i] = 0.0;
        }
    }

    // Second smoothing pass over the defined DX tail.
    let defined: Vec<f64> = dx.iter().copied().filter(|v| !v.is_nan()).collect();
    let adx = math::wilder_series(&defined, period);
    let offset = n - adx.len();
    for (i, value) in adx.into_iter().enumerate() {
        out[offset + i] = value;
    }
    out
}
