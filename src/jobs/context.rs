//! Job context for dependency injection.

use crate::config::Config;
use crate::metrics::Metrics;
use crate::risk::RiskPolicy;
use crate::services::market_data::{CandleFetcher, InstrumentSource, PriceSource};
use crate::services::sentiment::SentimentProvider;
use crate::signals::engine::ScoringEngine;
use crate::store::{DedupStore, SignalLog};
use crate::tracker::TradeTracker;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Context passed to job handlers via the Apalis Data<T> pattern.
///
/// The open-trade set is owned by the tracker and the dedup set by the scan
/// pass; handlers only go through those owners. `scan_running` is the
/// mutual-exclusion flag that makes an overlapping scoring pass skip instead
/// of queueing.
pub struct JobContext {
    pub config: Config,
    pub engine: ScoringEngine,
    pub risk_policy: RiskPolicy,
    pub fetcher: Arc<dyn CandleFetcher>,
    pub prices: Arc<dyn PriceSource>,
    pub instruments: Arc<dyn InstrumentSource>,
    pub sentiment: Option<Arc<dyn SentimentProvider>>,
    pub tracker: TradeTracker,
    pub signal_log: SignalLog,
    pub dedup: DedupStore,
    pub metrics: Option<Arc<Metrics>>,
    pub scan_running: AtomicBool,
}
