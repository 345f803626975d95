//! VWAP (Volume-Weighted Average Price), rolling-window variant.

use crate::models::candle::Candle;

/// Calculate a rolling VWAP series aligned to the candle index.
/// VWAP = sum(typical_price * volume) / sum(volume) over the window.
pub fn vwap_series(candles: &[Candle], period: usize) -> Vec<f64> {
    let n = candles.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 || n < period {
        return out;
    }

    for i in (period - 1)..n {
        let window = &candles[i + 1 - period..=i];
        let mut pv = 0.0;
        let mut v = 0.0;
        for c in window {
            let typical = (c.high + c.low + c.close) / 3.0;
            pv += typical * c.volume;
            v += c.volume;
        }
        if v > 0.0 {
            out[i] = pv / v;
        }
    }
    out
}
