//! Open and closed trade records tracked through the lifecycle state machine.

use crate::models::signal::Direction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseReason {
    Target,
    Stop,
    Manual,
}

/// A recommendation being monitored for a target or stop touch.
/// At most one open trade exists per signal id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenTrade {
    pub signal_id: String,
    pub symbol: String,
    pub direction: Direction,
    pub entry: f64,
    pub target: f64,
    pub stop: f64,
    pub risk_pct: f64,
    pub leverage: u32,
    pub reward_risk_ratio: f64,
    pub opened_at: DateTime<Utc>,
}

/// Immutable closure record appended to the closed-trade log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub signal_id: String,
    pub symbol: String,
    pub direction: Direction,
    pub entry: f64,
    pub target: f64,
    pub stop: f64,
    pub risk_pct: f64,
    pub leverage: u32,
    pub reward_risk_ratio: f64,
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    pub reason: CloseReason,
    pub close_price: f64,
    /// Leverage-independent price PnL in percent, so model statistics stay fair.
    pub pnl_pct: f64,
}

impl ClosedTrade {
    pub fn from_open(trade: OpenTrade, reason: CloseReason, close_price: f64, pnl_pct: f64) -> Self {
        Self {
            signal_id: trade.signal_id,
            symbol: trade.symbol,
            direction: trade.direction,
            entry: trade.entry,
            target: trade.target,
            stop: trade.stop,
            risk_pct: trade.risk_pct,
            leverage: trade.leverage,
            reward_risk_ratio: trade.reward_risk_ratio,
            opened_at: trade.opened_at,
            closed_at: Utc::now(),
            reason,
            close_price,
            pnl_pct,
        }
    }
}
