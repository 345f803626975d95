//! Trade lifecycle tracker.
//!
//! State machine per trade: OPEN -> CLOSED-{TARGET, STOP, MANUAL}, terminal.
//! The tracker owns the open-trade set; other components only hand it new
//! trades or query by id. Polling never closes on missing data and never
//! drops a trade because one poll iteration failed.

use crate::error::EngineError;
use crate::models::signal::Direction;
use crate::models::trade::{CloseReason, ClosedTrade, OpenTrade};
use crate::services::market_data::PriceSource;
use crate::store::TradeStore;
use tracing::{debug, info, warn};

pub struct TradeTracker {
    store: TradeStore,
}

impl TradeTracker {
    pub fn new(store: TradeStore) -> Self {
        Self { store }
    }

    /// Register a recommendation for monitoring. Re-opening an existing
    /// signal id replaces the previous entry rather than duplicating it.
    pub fn open(&self, trade: OpenTrade) -> Result<(), EngineError> {
        debug!(
            signal_id = %trade.signal_id,
            symbol = %trade.symbol,
            "tracking trade {}",
            trade.signal_id
        );
        self.store.put_open(trade)
    }

    pub fn get(&self, signal_id: &str) -> Option<OpenTrade> {
        self.store.get_open(signal_id)
    }

    pub fn open_trades(&self) -> Vec<OpenTrade> {
        self.store.open_trades().into_values().collect()
    }

    pub fn closed_trades(&self) -> Vec<ClosedTrade> {
        self.store.closed_trades()
    }

    /// Close a trade by signal id at the given price. Returns the closure
    /// record, or None when no such trade is open. A non-positive price is
    /// rejected and the trade stays open; the PnL formula divides by it for
    /// shorts.
    pub fn close(
        &self,
        signal_id: &str,
        reason: CloseReason,
        price: f64,
    ) -> Result<Option<ClosedTrade>, EngineError> {
        if price <= 0.0 {
            return Err(EngineError::Computation(format!(
                "cannot close {} at non-positive price {}",
                signal_id, price
            )));
        }
        let trade = match self.store.remove_open(signal_id)? {
            Some(trade) => trade,
            None => return Ok(None),
        };
        let pnl = pnl_percent(trade.direction, trade.entry, price);
        let record = ClosedTrade::from_open(trade, reason, price, pnl);
        self.store.append_closed(record.clone())?;
        info!(
            signal_id = %record.signal_id,
            symbol = %record.symbol,
            reason = ?record.reason,
            pnl_pct = record.pnl_pct,
            "closed {} at {} ({:.2}%)",
            record.symbol,
            price,
            record.pnl_pct
        );
        Ok(Some(record))
    }

    /// One poll pass over every open trade. Unavailable or non-positive
    /// quotes leave the trade open; a target touch wins over a stop touch in
    /// the same pass. Per-trade errors leave the trade open for the next
    /// poll.
    pub async fn poll(&self, prices: &dyn PriceSource) -> Vec<ClosedTrade> {
        let mut closed = Vec::new();
        for trade in self.open_trades() {
            let price = match prices.price_of(&trade.symbol).await {
                Ok(Some(p)) if p > 0.0 => p,
                Ok(_) => {
                    debug!(symbol = %trade.symbol, "no quote for {}, leaving open", trade.symbol);
                    continue;
                }
                Err(e) => {
                    warn!(symbol = %trade.symbol, error = %e, "price lookup failed, leaving open");
                    continue;
                }
            };

            let hit_target = match trade.direction {
                Direction::Long => price >= trade.target,
                Direction::Short => price <= trade.target,
            };
            let hit_stop = match trade.direction {
                Direction::Long => price <= trade.stop,
                Direction::Short => price >= trade.stop,
            };

            let reason = if hit_target {
                CloseReason::Target
            } else if hit_stop {
                CloseReason::Stop
            } else {
                continue;
            };

            match self.close(&trade.signal_id, reason, price) {
                Ok(Some(record)) => closed.push(record),
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        signal_id = %trade.signal_id,
                        error = %e,
                        "close failed, will retry next poll"
                    );
                }
            }
        }
        closed
    }
}

/// Leverage-independent price PnL in percent.
/// LONG: (price/entry - 1) * 100; SHORT: (entry/price - 1) * 100.
pub fn pnl_percent(direction: Direction, entry: f64, price: f64) -> f64 {
    match direction {
        Direction::Long => (price / entry - 1.0) * 100.0,
        Direction::Short => (entry / price - 1.0) * 100.0,
    }
}
