//! Money-flow based volume indicators: MFI and OBV.

use crate::models::candle::Candle;

/// Money Flow Index series aligned to the candle index.
/// MFI = 100 - 100 / (1 + positive_flow / negative_flow) over the window.
pub fn mfi_series(candles: &[Candle], period: usize) -> Vec<f64> {
    let n = candles.len();
    let mut out = vec![f64::NAN; n];
    if period == 0 || n < period + 1 {
        return out;
    }

    let typical: Vec<f64> = candles
        .iter()
        .map(|c| (c.high + c.low + c.close) / 3.0)
        .collect();

    // Signed raw money flow per candle, from the second candle on.
    let mut flows = vec![0.0; n];
    for i in 1..n {
        let raw = typical[i] * candles[i].volume;
        flows[i] = if typical[i] > typical[i - 1] {
            raw
        } else if typical[i] < typical[i - 1] {
            -raw
        } else {
            0.0
        };
    }

    for i in period..n {
        let window = &flows[i + 1 - period..=i];
        let positive: f64 = window.iter().filter(|f| **f > 0.0).sum();
        let negative: f64 = -window.iter().filter(|f| **f < 0.0).sum::<f64>();
        out[i] = if negative == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + positive / negative)
        };
    }
    out
}

/// On-Balance Volume series: cumulative volume signed by close direction.
pub fn obv_series(candles: &[Candle]) -> Vec<f64> {
    let mut out = vec![0.0; candles.len()];
    for i in 1..candles.len() {
        let delta = if candles[i].close > candles[i - 1].close {
            candles[i].volume
        } else if candles[i].close < candles[i - 1].close {
            -candles[i].volume
        } else {
            0.0
        };
        out[i] = out[i - 1] + delta;
    }
    out
}
