//! Prometheus metrics for the scoring and tracking passes.

use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};

pub struct Metrics {
    pub registry: Registry,
    pub scans_total: IntCounter,
    pub scans_skipped_total: IntCounter,
    pub signals_emitted_total: IntCounter,
    pub signals_skipped_total: IntCounterVec,
    pub trades_opened_total: IntCounter,
    pub trades_closed_total: IntCounterVec,
    pub scan_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let scans_total =
            IntCounter::new("scans_total", "Completed market scoring passes")?;
        let scans_skipped_total = IntCounter::new(
            "scans_skipped_total",
            "Scoring passes skipped because one was already running",
        )?;
        let signals_emitted_total =
            IntCounter::new("signals_emitted_total", "Accepted signals emitted")?;
        let signals_skipped_total = IntCounterVec::new(
            Opts::new("signals_skipped_total", "Instruments skipped by reason"),
            &["reason"],
        )?;
        let trades_opened_total =
            IntCounter::new("trades_opened_total", "Trades handed to the tracker")?;
        let trades_closed_total = IntCounterVec::new(
            Opts::new("trades_closed_total", "Trades closed by reason"),
            &["reason"],
        )?;
        let scan_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "scan_duration_seconds",
            "Wall-clock duration of one scoring pass",
        ))?;

        registry.register(Box::new(scans_total.clone()))?;
        registry.register(Box::new(scans_skipped_total.clone()))?;
        registry.register(Box::new(signals_emitted_total.clone()))?;
        registry.register(Box::new(signals_skipped_total.clone()))?;
        registry.register(Box::new(trades_opened_total.clone()))?;
        registry.register(Box::new(trades_closed_total.clone()))?;
        registry.register(Box::new(scan_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            scans_total,
            scans_skipped_total,
            signals_emitted_total,
            signals_skipped_total,
            trades_opened_total,
            trades_closed_total,
            scan_duration_seconds,
        })
    }
}
