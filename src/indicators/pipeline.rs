//! Full indicator pipeline over one normalized candle series.

use crate::error::EngineError;
use crate::indicators::momentum::{macd, rsi};
use crate::indicators::trend::{adx, ema};
use crate::indicators::volatility::{atr, bollinger};
use crate::indicators::volume::{flow, stats, vwap};
use crate::models::candle::Candle;
use crate::models::indicators::IndicatorSet;

pub const EMA_FAST: usize = 50;
pub const EMA_SLOW: usize = 200;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const RSI_PERIOD: usize = 14;
pub const ATR_PERIOD: usize = 14;
pub const ADX_PERIOD: usize = 14;
pub const MFI_PERIOD: usize = 14;
pub const VWAP_PERIOD: usize = 20;
pub const BB_PERIOD: usize = 20;
pub const BB_STD_DEV: f64 = 2.0;
pub const VOLUME_MEAN_PERIOD: usize = 20;
pub const VOLUME_STD_PERIOD: usize = 100;

/// Compute the full indicator set. `min_candles` must cover the slow EMA
/// baseline plus the rolling-statistics lookback (260 by default upstream).
pub fn compute_indicators(
    candles: &[Candle],
    min_candles: usize,
    max_volume_ratio: f64,
) -> Result<IndicatorSet, EngineError> {
    if candles.len() < min_candles {
        return Err(EngineError::InsufficientData {
            have: candles.len(),
            need: min_candles,
        });
    }

    let macd_series = macd::macd_series(candles, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
    let bb = bollinger::bollinger_series(candles, BB_PERIOD, BB_STD_DEV);
    let volume = stats::volume_stats(
        candles,
        VOLUME_MEAN_PERIOD,
        VOLUME_STD_PERIOD,
        max_volume_ratio,
    );

    Ok(IndicatorSet {
        close: candles.iter().map(|c| c.close).collect(),
        ema50: ema::ema_series(candles, EMA_FAST),
        ema200: ema::ema_series(candles, EMA_SLOW),
        macd: macd_series.macd,
        macd_signal: macd_series.signal,
        macd_hist: macd_series.histogram,
        rsi: rsi::rsi_series(candles, RSI_PERIOD),
        atr: atr::atr_series(candles, ATR_PERIOD),
        adx: adx::adx_series(candles, ADX_PERIOD),
        mfi: flow::mfi_series(candles, MFI_PERIOD),
        obv: flow::obv_series(candles),
        vwap: vwap::vwap_series(candles, VWAP_PERIOD),
        bb_upper: bb.upper,
        bb_lower: bb.lower,
        bb_bandwidth: bb.bandwidth,
        volume_mean: volume.mean,
        volume_z: volume.z_score,
        volume_ratio: volume.ratio,
    })
}
