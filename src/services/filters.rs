//! Instrument pre-filters applied before scoring.

use crate::models::candle::Candle;
use crate::services::market_data::TickerInfo;

/// Keep instruments whose 24h turnover sits inside the configured band.
/// Too thin trades badly; too hot is usually already crowded.
pub fn filter_by_volume(tickers: Vec<TickerInfo>, min: f64, max: f64) -> Vec<TickerInfo> {
    tickers
        .into_iter()
        .filter(|t| t.volume_24h >= min && t.volume_24h <= max)
        .collect()
}

/// Sideways market: the close range over the window is below the threshold.
pub fn is_sideways(candles: &[Candle], threshold: f64) -> bool {
    let max_close = candles.iter().map(|c| c.close).fold(f64::MIN, f64::max);
    let min_close = candles.iter().map(|c| c.close).fold(f64::MAX, f64::min);
    if candles.is_empty() || min_close <= 0.0 {
        return false;
    }
    (max_close - min_close) / min_close < threshold
}

/// Highly volatile: any single candle's high-low span exceeds the threshold.
pub fn is_highly_volatile(candles: &[Candle], threshold: f64) -> bool {
    candles
        .iter()
        .any(|c| c.low > 0.0 && (c.high - c.low) / c.low > threshold)
}
