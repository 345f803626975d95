//! Bollinger Bands indicator
//!
//! Middle Band = SMA(period)
//! Upper Band = Middle + (std_dev * standard deviation)
//! Lower Band = Middle - (std_dev * standard deviation)
//! Bandwidth  = (Upper - Lower) / close

use crate::common::math;
use crate::models::candle::Candle;

const EPS: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct BollingerSeries {
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
    pub bandwidth: Vec<f64>,
}

/// Calculate Bollinger band series aligned to the candle index.
pub fn bollinger_series(candles: &[Candle], period: usize, std_dev: f64) -> BollingerSeries {
    let n = candles.len();
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let middle = math::sma_series(&closes, period);
    let std = math::stddev_series(&closes, period);

    let mut upper = vec![f64::NAN; n];
    let mut lower = vec![f64::NAN; n];
    let mut bandwidth = vec![f64::NAN; n];
    for i in 0..n {
        if middle[i].is_nan() || std[i].is_nan() {
            continue;
        }
        upper[i] = middle[i] + std_dev * std[i];
        lower[i] = middle[i] - std_dev * std[i];
        bandwidth[i] = (upper[i] - lower[i]) / (closes[i] + EPS);
    }

    BollingerSeries {
        upper,
        lower,
        bandwidth,
    }
}
