//! Apalis worker setup for the scoring and tracking cadences.

use crate::jobs::context::JobContext;
use crate::jobs::handlers;
use crate::jobs::types::{PruneDedupJob, ScanMarketJob, TrackTradesJob};
use apalis::prelude::*;
use apalis_redis::RedisStorage;
use std::sync::Arc;
use tracing::info;

/// Engine runtime that sets up one Apalis worker per cadence.
pub struct EngineRuntime {
    job_context: Arc<JobContext>,
    scan_storage: Arc<RedisStorage<ScanMarketJob>>,
    track_storage: Arc<RedisStorage<TrackTradesJob>>,
    prune_storage: Arc<RedisStorage<PruneDedupJob>>,
}

impl EngineRuntime {
    pub fn new(
        job_context: Arc<JobContext>,
        scan_storage: Arc<RedisStorage<ScanMarketJob>>,
        track_storage: Arc<RedisStorage<TrackTradesJob>>,
        prune_storage: Arc<RedisStorage<PruneDedupJob>>,
    ) -> Self {
        Self {
            job_context,
            scan_storage,
            track_storage,
            prune_storage,
        }
    }

    /// Start all workers and return handles for graceful shutdown.
    pub async fn start_workers(
        &self,
    ) -> Result<Vec<tokio::task::JoinHandle<()>>, Box<dyn std::error::Error + Send + Sync>> {
        let mut handles = Vec::new();

        let scan_storage = (*self.scan_storage).clone();
        let scan_context = self.job_context.clone();
        handles.push(tokio::spawn(async move {
            let worker = WorkerBuilder::new("scan-market-worker")
                .data(scan_context)
                .backend(scan_storage)
                .build_fn(handlers::handle_scan_market);
            info!("EngineRuntime: ScanMarketJob worker started");
            worker.run().await;
        }));

        let track_storage = (*self.track_storage).clone();
        let track_context = self.job_context.clone();
        handles.push(tokio::spawn(async move {
            let worker = WorkerBuilder::new("track-trades-worker")
                .data(track_context)
                .backend(track_storage)
                .build_fn(handlers::handle_track_trades);
            info!("EngineRuntime: TrackTradesJob worker started");
            worker.run().await;
        }));

        let prune_storage = (*self.prune_storage).clone();
        let prune_context = self.job_context.clone();
        handles.push(tokio::spawn(async move {
            let worker = WorkerBuilder::new("prune-dedup-worker")
                .data(prune_context)
                .backend(prune_storage)
                .build_fn(handlers::handle_prune_dedup);
            info!("EngineRuntime: PruneDedupJob worker started");
            worker.run().await;
        }));

        info!("EngineRuntime: all workers started");
        Ok(handles)
    }
}
