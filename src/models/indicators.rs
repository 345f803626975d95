//! Aligned indicator series computed over one candle series.

use crate::error::EngineError;

/// Per-candle indicator series, index-aligned with the source candles.
/// Positions inside an indicator's warm-up window hold `f64::NAN`.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    pub close: Vec<f64>,
    pub ema50: Vec<f64>,
    pub ema200: Vec<f64>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub macd_hist: Vec<f64>,
    pub rsi: Vec<f64>,
    pub atr: Vec<f64>,
    pub adx: Vec<f64>,
    pub mfi: Vec<f64>,
    pub obv: Vec<f64>,
    pub vwap: Vec<f64>,
    pub bb_upper: Vec<f64>,
    pub bb_lower: Vec<f64>,
    pub bb_bandwidth: Vec<f64>,
    pub volume_mean: Vec<f64>,
    pub volume_z: Vec<f64>,
    pub volume_ratio: Vec<f64>,
}

/// Latest-row view used by the scoring decision.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    pub close: f64,
    pub ema50: f64,
    pub ema200: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub rsi: f64,
    pub atr: f64,
    pub adx: f64,
    pub vwap: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
    pub bb_bandwidth: f64,
    pub volume_z: f64,
    pub volume_ratio: f64,
}

impl IndicatorSet {
    /// View of the latest row. Gating inputs (close, both EMAs, MACD and its
    /// signal) must be defined; the remaining fields may be NaN and simply
    /// award no points downstream.
    pub fn snapshot(&self) -> Result<Snapshot, EngineError> {
        let last = |series: &[f64]| series.last().copied().unwrap_or(f64::NAN);
        let snapshot = Snapshot {
            close: last(&self.close),
            ema50: last(&self.ema50),
            ema200: last(&self.ema200),
            macd: last(&self.macd),
            macd_signal: last(&self.macd_signal),
            macd_hist: last(&self.macd_hist),
            rsi: last(&self.rsi),
            atr: last(&self.atr),
            adx: last(&self.adx),
            vwap: last(&self.vwap),
            bb_upper: last(&self.bb_upper),
            bb_lower: last(&self.bb_lower),
            bb_bandwidth: last(&self.bb_bandwidth),
            volume_z: last(&self.volume_z),
            volume_ratio: last(&self.volume_ratio),
        };
        for (name, value) in [
            ("close", snapshot.close),
            ("ema50", snapshot.ema50),
            ("ema200", snapshot.ema200),
            ("macd", snapshot.macd),
            ("macd_signal", snapshot.macd_signal),
        ] {
            if value.is_nan() {
                return Err(EngineError::Computation(format!(
                    "{} undefined at decision point",
                    name
                )));
            }
        }
        Ok(snapshot)
    }
}
