//! Signal records emitted by the scoring engine and enriched by the risk
//! evaluator.
//!
//! A skipped evaluation and an actionable candidate are different variants so
//! downstream code can never read price fields off a signal that has none.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
        }
    }
}

/// Why an instrument produced no candidate this pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    InsufficientData { have: usize },
    NoConsensus,
    LowProbability { probability: f64 },
    LowScore { score: f64 },
    Error { message: String },
}

impl SkipReason {
    pub fn code(&self) -> &'static str {
        match self {
            SkipReason::InsufficientData { .. } => "insufficient-data",
            SkipReason::NoConsensus => "no-consensus",
            SkipReason::LowProbability { .. } => "low-probability",
            SkipReason::LowScore { .. } => "low-score",
            SkipReason::Error { .. } => "error",
        }
    }
}

/// Scoring outcome for one instrument. `Skip` is terminal and carries no
/// price fields; it is never persisted as a trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Signal {
    Skip {
        symbol: String,
        reason: SkipReason,
    },
    Candidate(Box<SignalCandidate>),
}

impl Signal {
    pub fn skip(symbol: &str, reason: SkipReason) -> Self {
        Signal::Skip {
            symbol: symbol.to_string(),
            reason,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Signal::Skip { symbol, .. } => symbol,
            Signal::Candidate(c) => &c.symbol,
        }
    }
}

/// An accepted directional candidate with concrete entry/target/stop levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalCandidate {
    pub signal_id: String,
    pub symbol: String,
    pub direction: Direction,
    /// Composite heuristic score in [0, 100].
    pub score: f64,
    /// Classifier probability when a model contributed, else a fixed default.
    pub confidence: f64,
    pub entry: f64,
    pub target: f64,
    pub stop: f64,
    pub timeframe: String,
    pub created_at: DateTime<Utc>,
}

/// Reward:risk quality tier, a pure function of the ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityTier {
    Good,
    Marginal,
    Poor,
}

impl QualityTier {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 2.0 {
            QualityTier::Good
        } else if ratio >= 1.2 {
            QualityTier::Marginal
        } else {
            QualityTier::Poor
        }
    }
}
