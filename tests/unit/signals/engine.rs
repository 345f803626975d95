//! Unit tests for the composite scoring engine

use serde_json::{json, Value};
use signalis::classifier::ClassifierCell;
use signalis::models::signal::{Direction, Signal, SkipReason};
use signalis::signals::engine::{EngineConfig, ScoringEngine};
use signalis::signals::weights::ScoringWeights;
use std::io::Write;
use std::sync::Arc;

fn engine() -> ScoringEngine {
    ScoringEngine::new(
        EngineConfig::default(),
        ScoringWeights::default(),
        Arc::new(ClassifierCell::empty()),
    )
}

/// Raw kline rows in provider form: string fields, one-hour spacing.
fn raw_rows(prices: &[f64], volumes: &[f64]) -> Vec<Value> {
    prices
        .iter()
        .zip(volumes.iter())
        .enumerate()
        .map(|(i, (p, v))| {
            json!([
                (i as i64 * 3_600_000).to_string(),
                p.to_string(),
                (p + 0.1).to_string(),
                (p - 0.1).to_string(),
                p.to_string(),
                v.to_string(),
            ])
        })
        .collect()
}

fn uptrend(count: usize) -> (Vec<f64>, Vec<f64>) {
    let prices: Vec<f64> = (0..count).map(|i| 100.0 + i as f64 * 0.2).collect();
    let mut volumes = vec![1000.0; count];
    // Volume surge on the decision candle.
    if let Some(last) = volumes.last_mut() {
        *last = 5000.0;
    }
    (prices, volumes)
}

#[test]
fn test_default_weights_total_100() {
    assert_eq!(ScoringWeights::default().total(), 100.0);
}

#[tokio::test]
async fn test_short_history_skips_with_insufficient_data() {
    let (prices, volumes) = uptrend(50);
    let signal = engine().score("BTCUSDT", &raw_rows(&prices, &volumes), None, None).await;
    match signal {
        Signal::Skip { symbol, reason } => {
            assert_eq!(symbol, "BTCUSDT");
            assert_eq!(reason, SkipReason::InsufficientData { have: 50 });
        }
        Signal::Candidate(_) => panic!("expected skip on short history"),
    }
}

#[tokio::test]
async fn test_flat_market_has_no_consensus() {
    let prices = vec![100.0; 300];
    let volumes = vec![1000.0; 300];
    let signal = engine().score("ETHUSDT", &raw_rows(&prices, &volumes), None, None).await;
    match signal {
        Signal::Skip { reason, .. } => assert_eq!(reason, SkipReason::NoConsensus),
        Signal::Candidate(_) => panic!("flat market must not produce a candidate"),
    }
}

#[tokio::test]
async fn test_steady_uptrend_emits_long_candidate() {
    let (prices, volumes) = uptrend(300);
    let signal = engine().score("BTCUSDT", &raw_rows(&prices, &volumes), None, None).await;
    match signal {
        Signal::Candidate(candidate) => {
            assert_eq!(candidate.symbol, "BTCUSDT");
            assert_eq!(candidate.direction, Direction::Long);
            assert!(candidate.score >= 75.0);
            assert!(candidate.score <= 100.0);
            assert!(candidate.target > candidate.entry);
            assert!(candidate.stop < candidate.entry);
            // Minimum percentage levels always hold.
            assert!(candidate.target >= candidate.entry * 1.035);
            assert!(candidate.stop <= candidate.entry * 0.985);
            // No classifier loaded: fixed default confidence.
            assert_eq!(candidate.confidence, 0.8);
            assert!(candidate.signal_id.starts_with("BTCUSDT:"));
            assert_eq!(candidate.timeframe, "1H");
        }
        Signal::Skip { reason, .. } => panic!("expected candidate, skipped: {:?}", reason),
    }
}

#[tokio::test]
async fn test_uptrend_never_scores_short() {
    let (prices, volumes) = uptrend(300);
    let signal = engine().score("BTCUSDT", &raw_rows(&prices, &volumes), None, None).await;
    if let Signal::Candidate(candidate) = signal {
        assert_ne!(candidate.direction, Direction::Short);
    }
}

#[tokio::test]
async fn test_steady_downtrend_emits_short_candidate() {
    let prices: Vec<f64> = (0..300).map(|i| 200.0 - i as f64 * 0.2).collect();
    let mut volumes = vec![1000.0; 300];
    *volumes.last_mut().unwrap() = 5000.0;
    let signal = engine().score("SOLUSDT", &raw_rows(&prices, &volumes), None, None).await;
    match signal {
        Signal::Candidate(candidate) => {
            assert_eq!(candidate.direction, Direction::Short);
            assert!(candidate.target < candidate.entry);
            assert!(candidate.stop > candidate.entry);
        }
        Signal::Skip { reason, .. } => panic!("expected candidate, skipped: {:?}", reason),
    }
}

fn artifact_with_bias(bias: f64) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let artifact = json!({
        "feature_names": ["close", "ema50", "ema200", "macd", "macd_signal", "rsi", "vol_ratio"],
        "scaler": {
            "mean": [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            "std": [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]
        },
        "model": {
            "weights": [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            "bias": bias
        },
        "version": "test"
    });
    write!(file, "{}", artifact).unwrap();
    file
}

#[tokio::test]
async fn test_low_probability_classifier_rejects_candidate() {
    // Zero weights and a strongly negative bias pin the probability near 0.
    let file = artifact_with_bias(-10.0);
    let classifier = Arc::new(ClassifierCell::load_from(file.path()));
    let engine = ScoringEngine::new(
        EngineConfig::default(),
        ScoringWeights::default(),
        classifier,
    );

    let (prices, volumes) = uptrend(300);
    let signal = engine.score("BTCUSDT", &raw_rows(&prices, &volumes), None, None).await;
    match signal {
        Signal::Skip { reason, .. } => match reason {
            SkipReason::LowProbability { probability } => assert!(probability < 0.60),
            other => panic!("expected low-probability skip, got {:?}", other),
        },
        Signal::Candidate(_) => panic!("low probability must reject the candidate"),
    }
}

#[tokio::test]
async fn test_confident_classifier_sets_confidence_and_bonus() {
    let file = artifact_with_bias(10.0);
    let classifier = Arc::new(ClassifierCell::load_from(file.path()));
    let engine = ScoringEngine::new(
        EngineConfig::default(),
        ScoringWeights::default(),
        classifier,
    );

    let (prices, volumes) = uptrend(300);
    let signal = engine.score("BTCUSDT", &raw_rows(&prices, &volumes), None, None).await;
    match signal {
        Signal::Candidate(candidate) => {
            assert!(candidate.confidence > 0.99);
            assert!(candidate.score <= 100.0);
        }
        Signal::Skip { reason, .. } => panic!("expected candidate, skipped: {:?}", reason),
    }
}
