//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::models::candle::Candle;

/// Calculate an EMA series over candle closes, aligned to the candle index.
pub fn ema_series(candles: &[Candle], period: usize) -> Vec<f64> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    math::ema_series(&closes, period)
}

/// Latest EMA value for a specific period, if the series has warmed up.
pub fn latest_ema(candles: &[Candle], period: usize) -> Option<f64> {
    ema_series(candles, period)
        .last()
        .copied()
        .filter(|v| !v.is_nan())
}
