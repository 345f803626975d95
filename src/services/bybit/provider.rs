//! Bybit v5 REST market data provider.
//!
//! Serves the candle-fetch, price-lookup and instrument-listing interfaces
//! over the public `market/kline` and `market/tickers` endpoints. Requests
//! retry with bounded exponential backoff; exhaustion surfaces a fetch error
//! and the caller skips the instrument for this cycle.

use crate::error::EngineError;
use crate::services::market_data::{CandleFetcher, InstrumentSource, PriceSource, TickerInfo};
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.bybit.com";
const CATEGORY: &str = "linear";
const MAX_RETRIES: usize = 3;

pub struct BybitProvider {
    client: reqwest::Client,
    base_url: String,
}

impl BybitProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the provider at a different host (tests use a local mock).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, EngineError> {
        let request = || async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| EngineError::Fetch(e.to_string()))?;
            response
                .error_for_status()
                .map_err(|e| EngineError::Fetch(e.to_string()))?
                .json::<Value>()
                .await
                .map_err(|e| EngineError::Fetch(e.to_string()))
        };
        request
            .retry(
                ExponentialBuilder::default()
                    .with_max_times(MAX_RETRIES)
                    .with_min_delay(Duration::from_millis(200)),
            )
            .notify(|err: &EngineError, dur: Duration| {
                debug!(error = %err, backoff_ms = dur.as_millis() as u64, "retrying request");
            })
            .await
    }

    fn result_list(payload: &Value) -> Vec<Value> {
        payload
            .pointer("/result/list")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for BybitProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CandleFetcher for BybitProvider {
    async fn fetch(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Value>, EngineError> {
        let url = format!(
            "{}/v5/market/kline?category={}&symbol={}&interval={}&limit={}",
            self.base_url, CATEGORY, symbol, interval, limit
        );
        let payload = self.get_json(&url).await?;
        Ok(Self::result_list(&payload))
    }
}

#[async_trait]
impl PriceSource for BybitProvider {
    async fn price_of(&self, symbol: &str) -> Result<Option<f64>, EngineError> {
        // Latest 1-minute candle close stands in for a ticker quote.
        let rows = self.fetch(symbol, "1", 1).await?;
        let close = rows
            .first()
            .and_then(|row| row.get(4))
            .and_then(|v| match v {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            });
        Ok(close.filter(|p| *p > 0.0))
    }
}

#[async_trait]
impl InstrumentSource for BybitProvider {
    async fn usdt_tickers(&self) -> Result<Vec<TickerInfo>, EngineError> {
        let url = format!(
            "{}/v5/market/tickers?category={}",
            self.base_url, CATEGORY
        );
        let payload = self.get_json(&url).await?;
        let tickers = Self::result_list(&payload)
            .iter()
            .filter_map(|row| {
                let symbol = row.get("symbol")?.as_str()?;
                if !symbol.ends_with("USDT") {
                    return None;
                }
                let volume_24h: f64 = row.get("turnover24h")?.as_str()?.parse().ok()?;
                let last_price: f64 = row.get("lastPrice")?.as_str()?.parse().ok()?;
                Some(TickerInfo {
                    symbol: symbol.to_string(),
                    volume_24h,
                    last_price,
                })
            })
            .collect();
        Ok(tickers)
    }
}
