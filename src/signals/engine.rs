//! Composite signal scoring engine.
//!
//! One invocation turns a candle history into a directional candidate and a
//! 0-100 confidence score: a trend/momentum consensus gates the decision,
//! weighted factor awards build the heuristic score, and the optional
//! higher-timeframe, sentiment and classifier inputs adjust it within their
//! caps. Any internal failure degrades to a `Skip` signal so one instrument
//! can never abort the batch.

use crate::classifier::ClassifierCell;
use crate::common::math;
use crate::error::EngineError;
use crate::indicators::pipeline::{compute_indicators, EMA_FAST, EMA_SLOW};
use crate::indicators::structure::retracement;
use crate::indicators::trend::ema;
use crate::models::candle::{normalize_candles, Candle};
use crate::models::indicators::Snapshot;
use crate::models::signal::{Direction, Signal, SignalCandidate, SkipReason};
use crate::services::market_data::CandleFetcher;
use crate::services::sentiment::SentimentProvider;
use crate::signals::weights::ScoringWeights;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

const EPS: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Candles needed for the EMA200 baseline plus rolling-statistics lookback.
    pub min_candles: usize,
    /// Composite score floor for accepting a candidate.
    pub score_threshold: f64,
    /// Classifier probability floor; candidates below it are rejected outright.
    pub probability_floor: f64,
    /// ADX level counted as a strong trend.
    pub adx_threshold: f64,
    /// Volume surge thresholds.
    pub volume_ratio_threshold: f64,
    pub volume_z_threshold: f64,
    /// Outlier cap on the volume ratio.
    pub max_volume_ratio: f64,
    /// Squeeze: bandwidth below this fraction of its rolling median.
    pub squeeze_fraction: f64,
    pub squeeze_median_window: usize,
    /// Swing lookback for the retracement score.
    pub fib_lookback: usize,
    /// Higher-timeframe confirmation series.
    pub mtf_interval: String,
    pub mtf_limit: usize,
    pub mtf_min_candles: usize,
    /// Minimum percentage moves for target and stop.
    pub pct_target: f64,
    pub pct_stop: f64,
    /// ATR multiples compared against the percentage moves.
    pub atr_target_mult: f64,
    pub atr_stop_mult: f64,
    /// Bonus caps for the optional adjustments.
    pub sentiment_bonus: f64,
    pub classifier_bonus: f64,
    /// Confidence attached when no classifier contributed.
    pub default_confidence: f64,
    /// Label stamped on emitted candidates.
    pub timeframe: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_candles: 260,
            score_threshold: 75.0,
            probability_floor: 0.60,
            adx_threshold: 18.0,
            volume_ratio_threshold: 1.5,
            volume_z_threshold: 1.0,
            max_volume_ratio: 20.0,
            squeeze_fraction: 0.8,
            squeeze_median_window: 200,
            fib_lookback: 180,
            mtf_interval: "240".to_string(),
            mtf_limit: 260,
            mtf_min_candles: 60,
            pct_target: 0.035,
            pct_stop: 0.015,
            atr_target_mult: 2.0,
            atr_stop_mult: 1.0,
            sentiment_bonus: 10.0,
            classifier_bonus: 10.0,
            default_confidence: 0.8,
            timeframe: "1H".to_string(),
        }
    }
}

pub struct ScoringEngine {
    config: EngineConfig,
    weights: ScoringWeights,
    classifier: Arc<ClassifierCell>,
}

impl ScoringEngine {
    pub fn new(config: EngineConfig, weights: ScoringWeights, classifier: Arc<ClassifierCell>) -> Self {
        Self {
            config,
            weights,
            classifier,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Score one instrument. Internal errors become `Skip` signals with an
    /// error reason; this method never fails the caller's batch.
    pub async fn score(
        &self,
        symbol: &str,
        raw_candles: &[Value],
        fetcher: Option<&dyn CandleFetcher>,
        sentiment: Option<&dyn SentimentProvider>,
    ) -> Signal {
        match self.score_inner(symbol, raw_candles, fetcher, sentiment).await {
            Ok(signal) => signal,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "scoring failed for {}", symbol);
                Signal::skip(
                    symbol,
                    SkipReason::Error {
                        message: e.to_string(),
                    },
                )
            }
        }
    }

    async fn score_inner(
        &self,
        symbol: &str,
        raw_candles: &[Value],
        fetcher: Option<&dyn CandleFetcher>,
        sentiment: Option<&dyn SentimentProvider>,
    ) -> Result<Signal, EngineError> {
        let candles = normalize_candles(raw_candles);
        if candles.len() < self.config.min_candles {
            return Ok(Signal::skip(
                symbol,
                SkipReason::InsufficientData {
                    have: candles.len(),
                },
            ));
        }

        let indicators =
            compute_indicators(&candles, self.config.min_candles, self.config.max_volume_ratio)?;
        let latest = indicators.snapshot()?;

        // The single gating decision: no consensus, no score.
        let direction = match self.candidate_direction(&latest) {
            Some(direction) => direction,
            None => return Ok(Signal::skip(symbol, SkipReason::NoConsensus)),
        };

        let mut score = self.weights.trend;
        score += self.momentum_points(&latest, direction);
        score += self.trend_strength_points(&latest);
        score += self.relative_strength_points(&latest, direction);
        score += self.vwap_points(&latest, direction);
        score += self.volume_points(&latest);
        score += self.squeeze_points(&indicators.bb_bandwidth, &latest, direction);

        let fib = retracement::retracement_score(&candles, self.config.fib_lookback, direction);
        score += self.weights.retracement * fib;

        if let Some(fetcher) = fetcher {
            if let Some(mtf_up) = self.higher_timeframe_trend(symbol, fetcher).await {
                let confirms = match direction {
                    Direction::Long => mtf_up,
                    Direction::Short => !mtf_up,
                };
                if confirms {
                    score += self.weights.mtf;
                }
            }
        }

        if let Some(provider) = sentiment {
            if let Some(ns) = provider.score_of(symbol).await {
                let favor = match direction {
                    Direction::Long => (ns - 0.5).max(0.0) * 2.0,
                    Direction::Short => (0.5 - ns).max(0.0) * 2.0,
                };
                score = (score + self.config.sentiment_bonus * favor).min(100.0);
            }
        }

        let mut probability = None;
        if let Some(artifact) = self.classifier.current() {
            match artifact.predict(&self.feature_map(&latest)) {
                Ok(p) => {
                    if p < self.config.probability_floor {
                        return Ok(Signal::skip(
                            symbol,
                            SkipReason::LowProbability { probability: p },
                        ));
                    }
                    let span = (1.0 - self.config.probability_floor).max(EPS);
                    score = (score
                        + self.config.classifier_bonus * (p - self.config.probability_floor)
                            / span)
                        .min(100.0);
                    probability = Some(p);
                }
                Err(e) => {
                    // Heuristic-only fallback for this call; never abort.
                    warn!(symbol = %symbol, error = %e, "classifier skipped");
                }
            }
        }

        if score < self.config.score_threshold {
            debug!(symbol = %symbol, score = score, "score below threshold");
            return Ok(Signal::skip(symbol, SkipReason::LowScore { score }));
        }

        let entry = latest.close;
        let atr = if latest.atr.is_nan() { 0.0 } else { latest.atr };
        let (target, stop) = self.target_and_stop(entry, atr, direction);

        let candidate = SignalCandidate {
            signal_id: new_signal_id(symbol),
            symbol: symbol.to_string(),
            direction,
            score,
            confidence: probability.unwrap_or(self.config.default_confidence),
            entry,
            target,
            stop,
            timeframe: self.config.timeframe.clone(),
            created_at: Utc::now(),
        };
        info!(
            symbol = %symbol,
            direction = candidate.direction.as_str(),
            score = score,
            entry = entry,
            target = target,
            stop = stop,
            "signal candidate for {}: {} score={:.1}",
            symbol,
            candidate.direction.as_str(),
            score
        );
        Ok(Signal::Candidate(Box::new(candidate)))
    }

    fn candidate_direction(&self, latest: &Snapshot) -> Option<Direction> {
        let trend_up = latest.ema50 > latest.ema200;
        let trend_down = latest.ema50 < latest.ema200;
        let macd_bull = latest.macd > latest.macd_signal;
        let macd_bear = latest.macd < latest.macd_signal;
        if trend_up && macd_bull {
            Some(Direction::Long)
        } else if trend_down && macd_bear {
            Some(Direction::Short)
        } else {
            None
        }
    }

    fn momentum_points(&self, latest: &Snapshot, direction: Direction) -> f64 {
        let confirms = match direction {
            Direction::Long => latest.macd_hist > 0.0,
            Direction::Short => latest.macd_hist < 0.0,
        };
        if confirms {
            self.weights.macd
        } else {
            0.0
        }
    }

    fn trend_strength_points(&self, latest: &Snapshot) -> f64 {
        if latest.adx >= self.config.adx_threshold {
            self.weights.adx
        } else {
            0.0
        }
    }

    fn relative_strength_points(&self, latest: &Snapshot, direction: Direction) -> f64 {
        let favors = match direction {
            Direction::Long => latest.rsi > 50.0,
            Direction::Short => latest.rsi < 50.0,
        };
        if favors {
            self.weights.rsi
        } else {
            0.0
        }
    }

    fn vwap_points(&self, latest: &Snapshot, direction: Direction) -> f64 {
        let favors = match direction {
            Direction::Long => latest.close > latest.vwap,
            Direction::Short => latest.close < latest.vwap,
        };
        if favors {
            self.weights.vwap
        } else {
            0.0
        }
    }

    fn volume_points(&self, latest: &Snapshot) -> f64 {
        let surge = latest.volume_ratio > self.config.volume_ratio_threshold
            || latest.volume_z > self.config.volume_z_threshold;
        if surge {
            self.weights.volume
        } else {
            0.0
        }
    }

    /// Volatility-squeeze breakout: bandwidth compressed below a fraction of
    /// its rolling median while price breaks the directional band.
    fn squeeze_points(&self, bandwidth: &[f64], latest: &Snapshot, direction: Direction) -> f64 {
        let median = match math::trailing_median(bandwidth, self.config.squeeze_median_window) {
            Some(m) => m,
            None => return 0.0,
        };
        if latest.bb_bandwidth.is_nan() || latest.bb_bandwidth >= median * self.config.squeeze_fraction
        {
            return 0.0;
        }
        let breaks = match direction {
            Direction::Long => latest.close > latest.bb_upper,
            Direction::Short => latest.close < latest.bb_lower,
        };
        if breaks {
            self.weights.bollinger
        } else {
            0.0
        }
    }

    /// Reduced higher-timeframe pipeline: both EMAs on the confirmation
    /// series. None when the series is missing or too short.
    async fn higher_timeframe_trend(
        &self,
        symbol: &str,
        fetcher: &dyn CandleFetcher,
    ) -> Option<bool> {
        let raw = fetcher
            .fetch(symbol, &self.config.mtf_interval, self.config.mtf_limit)
            .await
            .map_err(|e| {
                debug!(symbol = %symbol, error = %e, "higher-timeframe fetch unavailable");
                e
            })
            .ok()?;
        let candles: Vec<Candle> = normalize_candles(&raw);
        if candles.len() < self.config.mtf_min_candles {
            return None;
        }
        let fast = ema::latest_ema(&candles, EMA_FAST)?;
        let slow = ema::latest_ema(&candles, EMA_SLOW.min(candles.len()))?;
        Some(fast > slow)
    }

    fn target_and_stop(&self, entry: f64, atr: f64, direction: Direction) -> (f64, f64) {
        // Take the more favorable of the percentage and ATR levels so quiet
        // instruments still get a meaningful target.
        match direction {
            Direction::Long => (
                (entry * (1.0 + self.config.pct_target))
                    .max(entry + self.config.atr_target_mult * atr),
                (entry * (1.0 - self.config.pct_stop)).min(entry - self.config.atr_stop_mult * atr),
            ),
            Direction::Short => (
                (entry * (1.0 - self.config.pct_target))
                    .min(entry - self.config.atr_target_mult * atr),
                (entry * (1.0 + self.config.pct_stop)).max(entry + self.config.atr_stop_mult * atr),
            ),
        }
    }

    fn feature_map(&self, latest: &Snapshot) -> HashMap<&'static str, f64> {
        HashMap::from([
            ("close", latest.close),
            ("ema50", latest.ema50),
            ("ema200", latest.ema200),
            ("macd", latest.macd),
            ("macd_signal", latest.macd_signal),
            ("rsi", latest.rsi),
            ("vol_ratio", latest.volume_ratio),
        ])
    }
}

fn new_signal_id(symbol: &str) -> String {
    format!("{}:{}", symbol, Utc::now().format("%Y%m%d%H%M%S"))
}
