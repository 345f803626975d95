//! Cron-based scheduler enqueuing one job per tick.

use apalis::prelude::*;
use apalis_redis::RedisStorage;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// Enqueues a prototype job on a cron schedule. Used for the scoring pass,
/// the tracker poll and the daily dedup prune, each on its own cadence.
pub struct JobScheduler<J>
where
    J: Clone + Send + Sync + 'static,
    RedisStorage<J>: Storage<Job = J> + Clone + Send + Sync + 'static,
    <RedisStorage<J> as Storage>::Error: std::fmt::Display,
{
    storage: Arc<RedisStorage<J>>,
    job: J,
    schedule: Schedule,
    name: &'static str,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl<J> JobScheduler<J>
where
    J: Clone + Send + Sync + 'static,
    RedisStorage<J>: Storage<Job = J> + Clone + Send + Sync + 'static,
    <RedisStorage<J> as Storage>::Error: std::fmt::Display,
{
    /// Schedule from a fixed interval. Zero disables the scheduler, which is
    /// a configuration error for the callers here.
    pub fn from_interval(
        storage: Arc<RedisStorage<J>>,
        job: J,
        name: &'static str,
        interval_seconds: u64,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        if interval_seconds == 0 {
            return Err(format!("scheduler '{}' disabled: interval is 0", name).into());
        }
        // Cron format: second minute hour day month weekday
        let cron_expr = if interval_seconds >= 60 {
            format!("0 */{} * * * *", interval_seconds / 60)
        } else {
            format!("*/{} * * * * *", interval_seconds)
        };
        Self::from_cron(storage, job, name, &cron_expr)
    }

    pub fn from_cron(
        storage: Arc<RedisStorage<J>>,
        job: J,
        name: &'static str,
        cron_expr: &str,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let schedule = Schedule::from_str(cron_expr)
            .map_err(|e| format!("invalid cron expression '{}': {}", cron_expr, e))?;

        info!(
            scheduler = name,
            cron = %cron_expr,
            "scheduler '{}' created (cron: {})",
            name,
            cron_expr
        );

        Ok(Self {
            storage,
            job,
            schedule,
            name,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Start the scheduler loop.
    pub async fn start(&self) {
        let storage = self.storage.clone();
        let job = self.job.clone();
        let schedule = self.schedule.clone();
        let name = self.name;
        let handle_arc = self.handle.clone();

        let handle = tokio::spawn(async move {
            info!(scheduler = name, "scheduler '{}' started", name);
            loop {
                let mut upcoming = schedule.upcoming(chrono::Utc);
                if let Some(next_tick) = upcoming.next() {
                    let now = chrono::Utc::now();
                    if next_tick > now {
                        let duration = (next_tick - now).to_std().unwrap_or_default();
                        tokio::time::sleep(duration).await;
                    }
                } else {
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                }

                let mut storage_clone = (*storage).clone();
                match storage_clone.push(job.clone()).await {
                    Ok(_) => {
                        debug!(scheduler = name, "enqueued tick for '{}'", name);
                    }
                    Err(e) => {
                        error!(
                            scheduler = name,
                            error = %e,
                            "failed to enqueue tick for '{}'",
                            name
                        );
                    }
                }
            }
        });

        let mut h = handle_arc.write().await;
        *h = Some(handle);
    }

    /// Stop the scheduler.
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!(scheduler = self.name, "scheduler '{}' stopped", self.name);
        }
    }

    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}
