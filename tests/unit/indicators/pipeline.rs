//! Unit tests for the indicator pipeline

use signalis::error::EngineError;
use signalis::indicators::pipeline::{compute_indicators, EMA_SLOW};
use signalis::models::candle::Candle;

fn rising_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let price = 100.0 + i as f64 * 0.2;
            Candle::new(
                i as i64 * 3_600_000,
                price,
                price + 0.1,
                price - 0.1,
                price,
                1000.0,
            )
        })
        .collect()
}

#[test]
fn test_insufficient_data_is_an_error() {
    let candles = rising_candles(100);
    let result = compute_indicators(&candles, 260, 20.0);
    match result {
        Err(EngineError::InsufficientData { have, need }) => {
            assert_eq!(have, 100);
            assert_eq!(need, 260);
        }
        other => panic!("expected InsufficientData, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_series_are_index_aligned() {
    let candles = rising_candles(300);
    let set = compute_indicators(&candles, 260, 20.0).unwrap();
    assert_eq!(set.close.len(), 300);
    assert_eq!(set.ema50.len(), 300);
    assert_eq!(set.ema200.len(), 300);
    assert_eq!(set.macd.len(), 300);
    assert_eq!(set.macd_signal.len(), 300);
    assert_eq!(set.rsi.len(), 300);
    assert_eq!(set.atr.len(), 300);
    assert_eq!(set.adx.len(), 300);
    assert_eq!(set.vwap.len(), 300);
    assert_eq!(set.bb_bandwidth.len(), 300);
    assert_eq!(set.volume_ratio.len(), 300);
}

#[test]
fn test_warmup_positions_hold_nan() {
    let candles = rising_candles(300);
    let set = compute_indicators(&candles, 260, 20.0).unwrap();
    // Slow EMA is undefined before its first full window and defined after.
    assert!(set.ema200[EMA_SLOW - 2].is_nan());
    assert!(!set.ema200[EMA_SLOW - 1].is_nan());
    assert!(!set.ema200[299].is_nan());
    assert!(set.ema50[10].is_nan());
    assert!(set.rsi[5].is_nan());
}

#[test]
fn test_snapshot_defined_on_full_series() {
    let candles = rising_candles(300);
    let set = compute_indicators(&candles, 260, 20.0).unwrap();
    let latest = set.snapshot().unwrap();
    assert!(latest.close > latest.ema50);
    assert!(latest.ema50 > latest.ema200);
    // Steady uptrend keeps momentum above its signal line.
    assert!(latest.macd > latest.macd_signal);
    assert!(latest.rsi > 50.0);
    assert!(latest.atr > 0.0);
}

#[test]
fn test_volume_ratio_never_exceeds_cap() {
    let mut candles = rising_candles(300);
    candles.last_mut().unwrap().volume = 1_000_000_000.0;
    let set = compute_indicators(&candles, 260, 20.0).unwrap();
    let ratio = *set.volume_ratio.last().unwrap();
    assert!(ratio > 19.0);
    assert!(ratio <= 20.0);
}

#[test]
fn test_volume_surge_visible_in_z_score() {
    let mut candles = rising_candles(300);
    candles.last_mut().unwrap().volume = 5000.0;
    let set = compute_indicators(&candles, 260, 20.0).unwrap();
    assert!(*set.volume_z.last().unwrap() > 1.0);
    assert!(*set.volume_ratio.last().unwrap() > 1.5);
}
