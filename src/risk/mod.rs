//! Risk evaluator: reward:risk ratio, quality tier and position sizing.

use crate::models::signal::{QualityTier, SignalCandidate};
use serde::{Deserialize, Serialize};

const EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarginMode {
    Isolated,
    Cross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionMode {
    OneWay,
    Hedge,
}

/// Caller-supplied trading defaults for the fixed policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSettings {
    pub risk_pct: f64,
    pub leverage: u32,
    pub margin_mode: MarginMode,
    pub position_mode: PositionMode,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            risk_pct: 1.0,
            leverage: 5,
            margin_mode: MarginMode::Isolated,
            position_mode: PositionMode::OneWay,
        }
    }
}

/// Sizing policy, selectable by configuration.
#[derive(Debug, Clone)]
pub enum RiskPolicy {
    /// Attach the provided defaults unchanged.
    FixedDefaults(RiskSettings),
    /// Scan leverage candidates ascending and pick the smallest for which
    /// the levered stop distance stays within 100% of margin.
    LeverageSearch { min: u32, max: u32 },
}

impl Default for RiskPolicy {
    fn default() -> Self {
        RiskPolicy::FixedDefaults(RiskSettings::default())
    }
}

/// Evaluation output attached to an accepted candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub reward_risk_ratio: f64,
    pub quality: QualityTier,
    pub leverage: u32,
    pub risk_pct: f64,
    pub margin_mode: MarginMode,
    pub position_mode: PositionMode,
    /// Set when risk-per-unit was non-positive; the ratio is forced to 0.
    pub degenerate: bool,
}

/// Compute reward:risk and sizing for an accepted candidate.
pub fn evaluate(candidate: &SignalCandidate, policy: &RiskPolicy) -> RiskAssessment {
    let risk_per_unit = (candidate.entry - candidate.stop).abs();
    let reward = (candidate.target - candidate.entry).abs();

    let degenerate = risk_per_unit <= 0.0;
    let ratio = if degenerate {
        0.0
    } else {
        reward / (risk_per_unit + EPS)
    };

    let (leverage, risk_pct, margin_mode, position_mode) = match policy {
        RiskPolicy::FixedDefaults(settings) => (
            settings.leverage,
            settings.risk_pct,
            settings.margin_mode,
            settings.position_mode,
        ),
        RiskPolicy::LeverageSearch { min, max } => {
            let leverage = search_leverage(candidate.entry, risk_per_unit, *min, *max);
            let stop_move_pct = if candidate.entry > 0.0 {
                risk_per_unit / candidate.entry * 100.0
            } else {
                0.0
            };
            (
                leverage,
                stop_move_pct * leverage as f64,
                MarginMode::Isolated,
                PositionMode::OneWay,
            )
        }
    };

    RiskAssessment {
        reward_risk_ratio: ratio,
        quality: QualityTier::from_ratio(ratio),
        leverage,
        risk_pct,
        margin_mode,
        position_mode,
        degenerate,
    }
}

/// Smallest leverage in [min, max] keeping the levered stop move at or below
/// 100% of margin; falls back to the minimum candidate when none qualifies.
fn search_leverage(entry: f64, risk_per_unit: f64, min: u32, max: u32) -> u32 {
    if entry <= 0.0 {
        return min;
    }
    let stop_move_pct = risk_per_unit / entry * 100.0;
    (min..=max)
        .find(|lev| stop_move_pct * *lev as f64 <= 100.0)
        .unwrap_or(min)
}
