//! Signalis Worker
//!
//! Runs the periodic market scoring pass, the trade tracker poll and the
//! daily dedup cleanup as Apalis jobs over a Redis queue.

use apalis_redis::RedisStorage;
use dotenvy::dotenv;
use signalis::classifier::ClassifierCell;
use signalis::config::Config;
use signalis::core::runtime::EngineRuntime;
use signalis::core::scheduler::JobScheduler;
use signalis::jobs::context::JobContext;
use signalis::jobs::types::{PruneDedupJob, ScanMarketJob, TrackTradesJob};
use signalis::logging;
use signalis::metrics::Metrics;
use signalis::risk::{RiskPolicy, RiskSettings};
use signalis::services::bybit::BybitProvider;
use signalis::services::sentiment::SentimentProvider;
use signalis::signals::engine::{EngineConfig, ScoringEngine};
use signalis::signals::weights::ScoringWeights;
use signalis::store::{DedupStore, SignalLog, TradeStore};
use signalis::tracker::TradeTracker;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    logging::init_logging();

    // Invalid configuration aborts here, before any pass begins.
    let config = Config::from_env()?;
    info!("Starting Signalis Worker");
    info!(environment = %config.environment, "Environment");

    let metrics = Arc::new(Metrics::new()?);

    let classifier = Arc::new(ClassifierCell::load_from(&config.model_path));

    let provider = Arc::new(BybitProvider::new());
    let engine = ScoringEngine::new(
        EngineConfig::default(),
        ScoringWeights::default(),
        classifier,
    );

    let risk_policy = if config.leverage_search {
        RiskPolicy::LeverageSearch {
            min: config.leverage_min,
            max: config.leverage_max,
        }
    } else {
        RiskPolicy::FixedDefaults(RiskSettings::default())
    };

    let tracker = TradeTracker::new(TradeStore::new(&config.data_dir));
    let signal_log = SignalLog::new(&config.data_dir);
    let dedup = DedupStore::new(&config.data_dir);

    // No news feed wired in this deployment; scoring degrades gracefully.
    let sentiment: Option<Arc<dyn SentimentProvider>> = None;

    info!("Initializing Apalis Redis storage...");
    let conn = apalis_redis::connect(config.redis_url.clone()).await?;
    let scan_storage: Arc<RedisStorage<ScanMarketJob>> =
        Arc::new(RedisStorage::new(conn.clone()));
    let track_storage: Arc<RedisStorage<TrackTradesJob>> =
        Arc::new(RedisStorage::new(conn.clone()));
    let prune_storage: Arc<RedisStorage<PruneDedupJob>> = Arc::new(RedisStorage::new(conn));
    info!("Apalis Redis storage initialized");

    let job_context = Arc::new(JobContext {
        config: config.clone(),
        engine,
        risk_policy,
        fetcher: provider.clone(),
        prices: provider.clone(),
        instruments: provider,
        sentiment,
        tracker,
        signal_log,
        dedup,
        metrics: Some(metrics),
        scan_running: AtomicBool::new(false),
    });

    info!("Starting Apalis workers...");
    let runtime = EngineRuntime::new(
        job_context,
        scan_storage.clone(),
        track_storage.clone(),
        prune_storage.clone(),
    );
    let worker_handles = runtime
        .start_workers()
        .await
        .map_err(|e| format!("Failed to start workers: {}", e))?;

    info!("Starting schedulers...");
    let scan_scheduler = JobScheduler::from_interval(
        scan_storage,
        ScanMarketJob::default(),
        "scan-market",
        config.scan_interval_minutes * 60,
    )?;
    scan_scheduler.start().await;

    let track_scheduler = JobScheduler::from_interval(
        track_storage,
        TrackTradesJob::default(),
        "track-trades",
        config.track_interval_minutes * 60,
    )?;
    track_scheduler.start().await;

    let prune_scheduler = JobScheduler::from_cron(
        prune_storage,
        PruneDedupJob::default(),
        "prune-dedup",
        &config.prune_cron,
    )?;
    prune_scheduler.start().await;

    info!("Worker started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down worker...");
            scan_scheduler.stop().await;
            track_scheduler.stop().await;
            prune_scheduler.stop().await;
            for handle in worker_handles {
                handle.abort();
            }
            info!("Worker stopped");
        }
    }

    Ok(())
}
