//! Job types for the scoring and tracking cadences.

use serde::{Deserialize, Serialize};

/// One full market scoring pass over the eligible instruments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanMarketJob {}

/// One tracker poll pass over the open trades.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackTradesJob {}

/// Daily retention cleanup of the per-day dedup set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PruneDedupJob {}
