//! Engine-wide error taxonomy.
//!
//! Data-shaped problems (too few candles, undefined indicator values) are
//! recovered locally by skipping the instrument; model problems fall back to
//! heuristic scoring; fetch problems are retried and then skipped; a corrupt
//! state file is treated as empty. Only `Config` is fatal, and only at startup.

use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// Too few candles to compute the indicator baseline.
    InsufficientData { have: usize, need: usize },
    /// An indicator was undefined (NaN) at the decision point.
    Computation(String),
    /// Classifier artifact could not be loaded or applied.
    Model(String),
    /// Candle or price source unreachable after bounded retries.
    Fetch(String),
    /// Persisted store unreadable or malformed.
    StateCorruption(String),
    /// Invalid configuration detected at startup.
    Config(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InsufficientData { have, need } => {
                write!(f, "insufficient data: {} candles, need {}", have, need)
            }
            EngineError::Computation(msg) => write!(f, "computation error: {}", msg),
            EngineError::Model(msg) => write!(f, "model error: {}", msg),
            EngineError::Fetch(msg) => write!(f, "fetch error: {}", msg),
            EngineError::StateCorruption(msg) => write!(f, "state corruption: {}", msg),
            EngineError::Config(msg) => write!(f, "config error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}
