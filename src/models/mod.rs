//! Shared data models spanning the engine layers.

pub mod candle;
pub mod indicators;
pub mod signal;
pub mod trade;

pub use candle::{normalize_candles, Candle};
pub use indicators::{IndicatorSet, Snapshot};
pub use signal::{Direction, QualityTier, Signal, SignalCandidate, SkipReason};
pub use trade::{CloseReason, ClosedTrade, OpenTrade};
