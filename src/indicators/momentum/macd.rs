//! MACD (Moving Average Convergence Divergence) indicator
//!
//! MACD = EMA(fast) - EMA(slow)
//! Signal = EMA(signal_period) of MACD
//! Histogram = MACD - Signal

use crate::common::math;
use crate::models::candle::Candle;

#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Calculate MACD, its signal line and histogram as aligned series.
pub fn macd_series(
    candles: &[Candle],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdSeries {
    let n = candles.len();
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let fast = math::ema_series(&closes, fast_period);
    let slow = math::ema_series(&closes, slow_period);

    let mut macd = vec![f64::NAN; n];
    for i in 0..n {
        if !fast[i].is_nan() && !slow[i].is_nan() {
            macd[i] = fast[i] - slow[i];
        }
    }

    // The signal line smooths only the defined part of the MACD line.
    let mut signal = vec![f64::NAN; n];
    let defined: Vec<f64> = macd.iter().copied().filter(|v| !v.is_nan()).collect();
    let smoothed = math::ema_series(&defined, signal_period);
    let offset = n - smoothed.len();
    for (i, value) in smoothed.into_iter().enumerate() {
        signal[offset + i] = value;
    }

    let mut histogram = vec![f64::NAN; n];
    for i in 0..n {
        if !macd[i].is_nan() && !signal[i].is_nan() {
            histogram[i] = macd[i] - signal[i];
        }
    }

    MacdSeries {
        macd,
        signal,
        histogram,
    }
}
