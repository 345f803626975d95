//! Market data provider interfaces consumed by the engine and tracker.

use crate::error::EngineError;
use async_trait::async_trait;
use serde_json::Value;

/// 24h ticker summary used by the instrument filters.
#[derive(Debug, Clone)]
pub struct TickerInfo {
    pub symbol: String,
    pub volume_24h: f64,
    pub last_price: f64,
}

/// Fetches raw candle records. Interval codes are opaque strings understood
/// by the provider (minute-resolution codes for Bybit-style feeds).
#[async_trait]
pub trait CandleFetcher: Send + Sync {
    async fn fetch(&self, symbol: &str, interval: &str, limit: usize)
        -> Result<Vec<Value>, EngineError>;
}

/// Current-price lookup for the trade tracker. `Ok(None)` means the quote is
/// unavailable this cycle; the caller leaves the trade open.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn price_of(&self, symbol: &str) -> Result<Option<f64>, EngineError>;
}

/// Lists the tradable instruments eligible for a scoring pass.
#[async_trait]
pub trait InstrumentSource: Send + Sync {
    async fn usdt_tickers(&self) -> Result<Vec<TickerInfo>, EngineError>;
}
