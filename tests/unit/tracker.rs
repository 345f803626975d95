//! Unit tests for the trade lifecycle tracker

use async_trait::async_trait;
use chrono::Utc;
use signalis::error::EngineError;
use signalis::models::signal::Direction;
use signalis::models::trade::{CloseReason, OpenTrade};
use signalis::services::market_data::PriceSource;
use signalis::store::TradeStore;
use signalis::tracker::{pnl_percent, TradeTracker};
use std::collections::HashMap;

fn trade(signal_id: &str, direction: Direction, entry: f64, target: f64, stop: f64) -> OpenTrade {
    OpenTrade {
        signal_id: signal_id.to_string(),
        symbol: signal_id.split(':').next().unwrap().to_string(),
        direction,
        entry,
        target,
        stop,
        risk_pct: 1.0,
        leverage: 5,
        reward_risk_ratio: 2.0,
        opened_at: Utc::now(),
    }
}

fn tracker_in(dir: &tempfile::TempDir) -> TradeTracker {
    TradeTracker::new(TradeStore::new(dir.path()))
}

/// Fixed quote table; symbols absent from the table report no quote.
struct FixedPrices {
    quotes: HashMap<String, f64>,
    failing: Vec<String>,
}

impl FixedPrices {
    fn new(quotes: &[(&str, f64)]) -> Self {
        Self {
            quotes: quotes
                .iter()
                .map(|(s, p)| (s.to_string(), *p))
                .collect(),
            failing: Vec::new(),
        }
    }
}

#[async_trait]
impl PriceSource for FixedPrices {
    async fn price_of(&self, symbol: &str) -> Result<Option<f64>, EngineError> {
        if self.failing.iter().any(|s| s == symbol) {
            return Err(EngineError::Fetch("simulated outage".to_string()));
        }
        Ok(self.quotes.get(symbol).copied())
    }
}

#[test]
fn test_pnl_percent() {
    assert!((pnl_percent(Direction::Long, 100.0, 110.0) - 10.0).abs() < 1e-9);
    assert!((pnl_percent(Direction::Long, 100.0, 90.0) + 10.0).abs() < 1e-9);
    assert_eq!(pnl_percent(Direction::Long, 100.0, 100.0), 0.0);
    // Doubling the price doubles a long position.
    assert!((pnl_percent(Direction::Long, 100.0, 200.0) - 100.0).abs() < 1e-9);
    // Short halving the price doubles the position.
    assert!((pnl_percent(Direction::Short, 100.0, 50.0) - 100.0).abs() < 1e-9);
    assert!((pnl_percent(Direction::Short, 100.0, 110.0) + 9.0909).abs() < 1e-3);
}

#[test]
fn test_open_is_idempotent_per_signal_id() {
    let dir = tempfile::tempdir().unwrap();
    let tracker = tracker_in(&dir);

    tracker
        .open(trade("BTCUSDT:1", Direction::Long, 100.0, 110.0, 95.0))
        .unwrap();
    tracker
        .open(trade("BTCUSDT:1", Direction::Long, 101.0, 111.0, 96.0))
        .unwrap();

    let open = tracker.open_trades();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].entry, 101.0);
}

#[test]
fn test_manual_close_records_pnl() {
    let dir = tempfile::tempdir().unwrap();
    let tracker = tracker_in(&dir);
    tracker
        .open(trade("BTCUSDT:1", Direction::Long, 100.0, 110.0, 95.0))
        .unwrap();

    let record = tracker
        .close("BTCUSDT:1", CloseReason::Manual, 105.0)
        .unwrap()
        .expect("trade was open");
    assert_eq!(record.reason, CloseReason::Manual);
    assert!((record.pnl_pct - 5.0).abs() < 1e-9);
    assert!(tracker.open_trades().is_empty());
    assert_eq!(tracker.closed_trades().len(), 1);

    // Closing again finds nothing.
    let again = tracker.close("BTCUSDT:1", CloseReason::Manual, 105.0).unwrap();
    assert!(again.is_none());
}

#[test]
fn test_manual_close_rejects_non_positive_price() {
    let dir = tempfile::tempdir().unwrap();
    let tracker = tracker_in(&dir);
    tracker
        .open(trade("ETHUSDT:1", Direction::Short, 100.0, 90.0, 105.0))
        .unwrap();

    // A zero quote would divide the short PnL by zero.
    assert!(tracker.close("ETHUSDT:1", CloseReason::Manual, 0.0).is_err());
    assert!(tracker.close("ETHUSDT:1", CloseReason::Manual, -1.0).is_err());

    // The trade stays open and can still close at a real price.
    assert_eq!(tracker.open_trades().len(), 1);
    let record = tracker
        .close("ETHUSDT:1", CloseReason::Manual, 95.0)
        .unwrap()
        .expect("trade was open");
    assert!(record.pnl_pct > 0.0);
}

#[tokio::test]
async fn test_poll_closes_on_target_touch() {
    let dir = tempfile::tempdir().unwrap();
    let tracker = tracker_in(&dir);
    tracker
        .open(trade("BTCUSDT:1", Direction::Long, 100.0, 110.0, 95.0))
        .unwrap();

    let closed = tracker
        .poll(&FixedPrices::new(&[("BTCUSDT", 111.0)]))
        .await;
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].reason, CloseReason::Target);
    assert!(closed[0].pnl_pct > 0.0);
    assert!(tracker.open_trades().is_empty());
}

#[tokio::test]
async fn test_poll_closes_on_stop_touch() {
    let dir = tempfile::tempdir().unwrap();
    let tracker = tracker_in(&dir);
    tracker
        .open(trade("ETHUSDT:1", Direction::Short, 100.0, 90.0, 105.0))
        .unwrap();

    let closed = tracker
        .poll(&FixedPrices::new(&[("ETHUSDT", 106.0)]))
        .await;
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].reason, CloseReason::Stop);
    assert!(closed[0].pnl_pct < 0.0);
}

#[tokio::test]
async fn test_poll_target_wins_when_both_touched() {
    let dir = tempfile::tempdir().unwrap();
    let tracker = tracker_in(&dir);
    // Degenerate levels where one quote satisfies both conditions.
    tracker
        .open(trade("BTCUSDT:1", Direction::Long, 100.0, 100.0, 100.0))
        .unwrap();

    let closed = tracker
        .poll(&FixedPrices::new(&[("BTCUSDT", 100.0)]))
        .await;
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].reason, CloseReason::Target);
}

#[tokio::test]
async fn test_poll_leaves_open_without_quote() {
    let dir = tempfile::tempdir().unwrap();
    let tracker = tracker_in(&dir);
    tracker
        .open(trade("BTCUSDT:1", Direction::Long, 100.0, 110.0, 95.0))
        .unwrap();

    // No quote at all.
    let closed = tracker.poll(&FixedPrices::new(&[])).await;
    assert!(closed.is_empty());
    assert_eq!(tracker.open_trades().len(), 1);

    // Non-positive quote.
    let closed = tracker
        .poll(&FixedPrices::new(&[("BTCUSDT", 0.0)]))
        .await;
    assert!(closed.is_empty());
    assert_eq!(tracker.open_trades().len(), 1);
}

#[tokio::test]
async fn test_poll_survives_per_symbol_failures() {
    let dir = tempfile::tempdir().unwrap();
    let tracker = tracker_in(&dir);
    tracker
        .open(trade("BTCUSDT:1", Direction::Long, 100.0, 110.0, 95.0))
        .unwrap();
    tracker
        .open(trade("ETHUSDT:1", Direction::Long, 10.0, 11.0, 9.5))
        .unwrap();

    let mut prices = FixedPrices::new(&[("ETHUSDT", 11.5)]);
    prices.failing.push("BTCUSDT".to_string());

    let closed = tracker.poll(&prices).await;
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].signal_id, "ETHUSDT:1");
    // The failing symbol stays open for the next poll.
    assert_eq!(tracker.open_trades().len(), 1);
    assert_eq!(tracker.open_trades()[0].signal_id, "BTCUSDT:1");
}

#[tokio::test]
async fn test_poll_inside_band_keeps_trade_open() {
    let dir = tempfile::tempdir().unwrap();
    let tracker = tracker_in(&dir);
    tracker
        .open(trade("BTCUSDT:1", Direction::Long, 100.0, 110.0, 95.0))
        .unwrap();

    let closed = tracker
        .poll(&FixedPrices::new(&[("BTCUSDT", 102.0)]))
        .await;
    assert!(closed.is_empty());
    assert_eq!(tracker.open_trades().len(), 1);
}
