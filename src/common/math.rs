//! Shared math helpers for the indicator pipeline.
//!
//! Series functions return a vector aligned to the input index. Positions
//! inside an indicator's warm-up window hold `f64::NAN` so a consumer can
//! never mistake an unseeded value for a real one.

/// Simple moving average of the last `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let sum: f64 = values[values.len() - period..].iter().sum();
    Some(sum / period as f64)
}

/// Population standard deviation of the last `period` values.
pub fn standard_deviation(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    let mean = window.iter().sum::<f64>() / period as f64;
    let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
    Some(variance.sqrt())
}

/// True range: the largest of high-low, |high-prev_close|, |low-prev_close|.
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// Rolling simple moving average series.
pub fn sma_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    let mut sum: f64 = values[..period].iter().sum();
    out[period - 1] = sum / period as f64;
    for i in period..values.len() {
        sum += values[i] - values[i - period];
        out[i] = sum / period as f64;
    }
    out
}

/// Exponential moving average series, seeded with the SMA of the first window.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    let mut prev = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = prev;
    let k = 2.0 / (period as f64 + 1.0);
    for i in period..values.len() {
        prev = values[i] * k + prev * (1.0 - k);
        out[i] = prev;
    }
    out
}

/// Wilder-smoothed series (smoothing factor 1/period), seeded with the SMA
/// of the first window. Used by ATR, RSI and ADX.
pub fn wilder_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    let mut prev = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = prev;
    for i in period..values.len() {
        prev = (prev * (period as f64 - 1.0) + values[i]) / period as f64;
        out[i] = prev;
    }
    out
}

/// Rolling population standard deviation series.
pub fn stddev_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
        out[i] = variance.sqrt();
    }
    out
}

/// Median of the trailing `period` values ending at the series tail,
/// ignoring NaN entries. None if the window holds no defined values.
pub fn trailing_median(values: &[f64], period: usize) -> Option<f64> {
    if values.is_empty() || period == 0 {
        return None;
    }
    let start = values.len().saturating_sub(period);
    let mut window: Vec<f64> = values[start..].iter().copied().filter(|v| !v.is_nan()).collect();
    if window.is_empty() {
        return None;
    }
    window.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = window.len() / 2;
    if window.len() % 2 == 0 {
        Some((window[mid - 1] + window[mid]) / 2.0)
    } else {
        Some(window[mid])
    }
}
