//! Fibonacci retracement congruence score.
//!
//! Scores how well the latest close sits inside the 38.2-61.8% pullback band
//! of the recent swing, oriented for the candidate direction. 1.0 inside the
//! band, dropping off with distance from the 50% level outside it.

use crate::models::candle::Candle;
use crate::models::signal::Direction;

const EPS: f64 = 1e-9;

/// Congruence score in [0, 1] between `close` and the retracement band of
/// the `swing_low..swing_high` range. Degenerate swings score 0.
pub fn pullback_score(close: f64, swing_low: f64, swing_high: f64, direction: Direction) -> f64 {
    if swing_high <= swing_low {
        return 0.0;
    }
    let range = swing_high - swing_low;
    let (fib382, fib500, fib618) = match direction {
        Direction::Long => (
            swing_high - 0.382 * range,
            swing_high - 0.500 * range,
            swing_high - 0.618 * range,
        ),
        Direction::Short => (
            swing_low + 0.382 * range,
            swing_low + 0.500 * range,
            swing_low + 0.618 * range,
        ),
    };
    let lo = fib618.min(fib382);
    let hi = fib618.max(fib382);
    if close < lo || close > hi {
        let distance = (close - fib500).abs() / ((hi - lo).abs() + EPS);
        (1.0 - 2.0 * distance).max(0.0)
    } else {
        1.0
    }
}

/// Swing-based score over the trailing `lookback` candles.
pub fn retracement_score(candles: &[Candle], lookback: usize, direction: Direction) -> f64 {
    if candles.is_empty() {
        return 0.0;
    }
    let start = candles.len().saturating_sub(lookback);
    let window = &candles[start..];
    let swing_high = window.iter().map(|c| c.high).fold(f64::MIN, f64::max);
    let swing_low = window.iter().map(|c| c.low).fold(f64::MAX, f64::min);
    let close = candles[candles.len() - 1].close;
    pullback_score(close, swing_low, swing_high, direction)
}
