//! Rolling volume statistics: mean, z-score and capped ratio.

use crate::common::math;
use crate::models::candle::Candle;

const EPS: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct VolumeStats {
    pub mean: Vec<f64>,
    pub z_score: Vec<f64>,
    pub ratio: Vec<f64>,
}

/// Rolling volume mean over `mean_period`, a z-score against the rolling
/// `std_period` standard deviation, and the current/mean ratio capped at
/// `max_ratio` so a single outlier candle cannot dominate the surge check.
pub fn volume_stats(
    candles: &[Candle],
    mean_period: usize,
    std_period: usize,
    max_ratio: f64,
) -> VolumeStats {
    let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();
    let mean = math::sma_series(&volumes, mean_period);
    let std = math::stddev_series(&volumes, std_period);

    let n = volumes.len();
    let mut z_score = vec![f64::NAN; n];
    let mut ratio = vec![f64::NAN; n];
    for i in 0..n {
        if !mean[i].is_nan() {
            ratio[i] = (volumes[i] / (mean[i] + EPS)).min(max_ratio);
            if !std[i].is_nan() {
                z_score[i] = (volumes[i] - mean[i]) / (std[i] + EPS);
            }
        }
    }

    VolumeStats {
        mean,
        z_score,
        ratio,
    }
}
