//! Job handlers for the scoring and tracking cadences.

use crate::jobs::context::JobContext;
use crate::jobs::types::{PruneDedupJob, ScanMarketJob, TrackTradesJob};
use crate::models::candle::normalize_candles;
use crate::models::signal::Signal;
use crate::models::trade::OpenTrade;
use crate::risk;
use crate::services::filters;
use crate::store::SignalRecord;
use apalis::prelude::*;
use chrono::Utc;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Handler for one market scoring pass.
///
/// Guarded by the run-in-progress flag: a trigger arriving while a pass is
/// still running is skipped with a notice, never queued, because two passes
/// sharing the per-day dedup state could double-count a symbol.
pub async fn handle_scan_market(
    _job: ScanMarketJob,
    ctx: Data<Arc<JobContext>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if ctx.scan_running.swap(true, Ordering::SeqCst) {
        warn!("previous scoring pass still running, skipping this trigger");
        if let Some(ref metrics) = ctx.metrics {
            metrics.scans_skipped_total.inc();
        }
        return Ok(());
    }

    let start = Instant::now();
    let result = run_scan(&ctx).await;
    ctx.scan_running.store(false, Ordering::SeqCst);

    if let Some(ref metrics) = ctx.metrics {
        metrics.scan_duration_seconds.observe(start.elapsed().as_secs_f64());
        metrics.scans_total.inc();
    }

    if let Err(ref e) = result {
        error!(error = %e, "scoring pass failed: {}", e);
    }
    result
}

/// One full scoring pass: list instruments, filter, score, size and persist.
pub async fn run_scan(ctx: &JobContext) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let today = Utc::now().date_naive();

    let tickers = ctx.instruments.usdt_tickers().await?;
    let eligible =
        filters::filter_by_volume(tickers, ctx.config.volume_min, ctx.config.volume_max);
    info!(
        instruments = eligible.len(),
        "scoring pass over {} instruments",
        eligible.len()
    );

    let mut sent = 0;
    for ticker in &eligible {
        let symbol = ticker.symbol.as_str();

        if ctx.dedup.is_used(today, symbol) {
            debug!(symbol = %symbol, "already signaled today, skipping {}", symbol);
            continue;
        }

        // A single instrument's failure never aborts the batch.
        match score_instrument(ctx, symbol, today).await {
            Ok(true) => {
                sent += 1;
                if sent >= ctx.config.max_signals_per_run {
                    break;
                }
            }
            Ok(false) => {}
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "instrument failed, continuing batch");
            }
        }
    }

    if sent == 0 {
        info!("no qualifying signals this pass");
    }
    Ok(())
}

/// Score one instrument end to end. Returns true when a signal was emitted.
async fn score_instrument(
    ctx: &JobContext,
    symbol: &str,
    today: chrono::NaiveDate,
) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
    // Structure pre-filters run on a short, coarse series.
    let raw_filter = ctx
        .fetcher
        .fetch(symbol, &ctx.config.filter_interval, ctx.config.filter_limit)
        .await?;
    let filter_candles = normalize_candles(&raw_filter);
    if filter_candles.is_empty() {
        debug!(symbol = %symbol, "no candles for {}, skipping", symbol);
        return Ok(false);
    }
    if filters::is_sideways(&filter_candles, ctx.config.sideways_threshold) {
        debug!(symbol = %symbol, "sideways market, skipping {}", symbol);
        return Ok(false);
    }
    if filters::is_highly_volatile(&filter_candles, ctx.config.volatility_threshold) {
        debug!(symbol = %symbol, "too volatile, skipping {}", symbol);
        return Ok(false);
    }

    let raw = ctx
        .fetcher
        .fetch(symbol, &ctx.config.base_interval, ctx.config.base_limit)
        .await?;

    let signal = ctx
        .engine
        .score(
            symbol,
            &raw,
            Some(ctx.fetcher.as_ref()),
            ctx.sentiment.as_deref(),
        )
        .await;

    let candidate = match signal {
        Signal::Skip { reason, .. } => {
            debug!(symbol = %symbol, reason = reason.code(), "no signal for {}", symbol);
            if let Some(ref metrics) = ctx.metrics {
                metrics
                    .signals_skipped_total
                    .with_label_values(&[reason.code()])
                    .inc();
            }
            return Ok(false);
        }
        Signal::Candidate(candidate) => candidate,
    };

    let assessment = risk::evaluate(&candidate, &ctx.risk_policy);
    if assessment.quality == crate::models::signal::QualityTier::Poor {
        debug!(
            symbol = %symbol,
            ratio = assessment.reward_risk_ratio,
            "poor reward:risk ({:.2}), dropping",
            assessment.reward_risk_ratio
        );
        return Ok(false);
    }

    info!(
        symbol = %symbol,
        signal_id = %candidate.signal_id,
        direction = candidate.direction.as_str(),
        score = candidate.score,
        ratio = assessment.reward_risk_ratio,
        leverage = assessment.leverage,
        "emitting {} {} score={:.1} rr={:.2}",
        symbol,
        candidate.direction.as_str(),
        candidate.score,
        assessment.reward_risk_ratio
    );

    let trade = OpenTrade {
        signal_id: candidate.signal_id.clone(),
        symbol: candidate.symbol.clone(),
        direction: candidate.direction,
        entry: candidate.entry,
        target: candidate.target,
        stop: candidate.stop,
        risk_pct: assessment.risk_pct,
        leverage: assessment.leverage,
        reward_risk_ratio: assessment.reward_risk_ratio,
        opened_at: candidate.created_at,
    };

    ctx.signal_log.append(SignalRecord {
        candidate: *candidate,
        risk: assessment,
    })?;
    ctx.tracker.open(trade)?;
    ctx.dedup.mark_used(today, symbol)?;

    if let Some(ref metrics) = ctx.metrics {
        metrics.signals_emitted_total.inc();
        metrics.trades_opened_total.inc();
    }
    Ok(true)
}

/// Handler for one tracker poll pass over the open trades.
pub async fn handle_track_trades(
    _job: TrackTradesJob,
    ctx: Data<Arc<JobContext>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let closed = ctx.tracker.poll(ctx.prices.as_ref()).await;
    for record in &closed {
        if let Some(ref metrics) = ctx.metrics {
            let reason = match record.reason {
                crate::models::trade::CloseReason::Target => "target",
                crate::models::trade::CloseReason::Stop => "stop",
                crate::models::trade::CloseReason::Manual => "manual",
            };
            metrics.trades_closed_total.with_label_values(&[reason]).inc();
        }
    }
    if !closed.is_empty() {
        info!(closed = closed.len(), "closed {} trades this poll", closed.len());
    }
    Ok(())
}

/// Handler for the daily dedup retention cleanup.
pub async fn handle_prune_dedup(
    _job: PruneDedupJob,
    ctx: Data<Arc<JobContext>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let pruned = ctx.dedup.prune(ctx.config.dedup_retention_days)?;
    if pruned > 0 {
        info!(days = pruned, "pruned {} expired dedup days", pruned);
    }
    Ok(())
}
