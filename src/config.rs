//! Environment-based configuration.
//!
//! Everything has a sane default so a sandbox run works out of the box;
//! malformed overrides are a fatal startup error rather than a silent
//! fallback mid-pass.

use crate::error::EngineError;
use std::env;
use std::path::PathBuf;

pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_redis_url() -> String {
    env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub redis_url: String,
    /// Scoring pass interval in minutes.
    pub scan_interval_minutes: u64,
    /// Tracker poll interval in minutes.
    pub track_interval_minutes: u64,
    /// Cron expression for the daily dedup prune.
    pub prune_cron: String,
    pub dedup_retention_days: i64,
    pub max_signals_per_run: usize,
    /// 24h turnover band for the instrument filter.
    pub volume_min: f64,
    pub volume_max: f64,
    /// Pre-filter candle series (sideways/volatility checks).
    pub filter_interval: String,
    pub filter_limit: usize,
    pub sideways_threshold: f64,
    pub volatility_threshold: f64,
    /// Primary scoring series.
    pub base_interval: String,
    pub base_limit: usize,
    pub data_dir: PathBuf,
    pub model_path: PathBuf,
    /// Leverage-search sizing instead of fixed defaults.
    pub leverage_search: bool,
    pub leverage_min: u32,
    pub leverage_max: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "sandbox".to_string(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            scan_interval_minutes: 15,
            track_interval_minutes: 2,
            prune_cron: "0 0 0 * * *".to_string(),
            dedup_retention_days: 7,
            max_signals_per_run: 1,
            volume_min: 50_000_000.0,
            volume_max: 300_000_000.0,
            filter_interval: "15".to_string(),
            filter_limit: 100,
            sideways_threshold: 0.01,
            volatility_threshold: 0.06,
            base_interval: "60".to_string(),
            base_limit: 300,
            data_dir: PathBuf::from("data"),
            model_path: PathBuf::from("model/artifact.json"),
            leverage_search: false,
            leverage_min: 7,
            leverage_max: 15,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, EngineError> {
        let defaults = Self::default();
        Ok(Self {
            environment: get_environment(),
            redis_url: get_redis_url(),
            scan_interval_minutes: parsed("SIGNAL_INTERVAL_MINUTES", defaults.scan_interval_minutes)?,
            track_interval_minutes: parsed("TRACK_INTERVAL_MINUTES", defaults.track_interval_minutes)?,
            prune_cron: env::var("PRUNE_CRON").unwrap_or(defaults.prune_cron),
            dedup_retention_days: parsed("DEDUP_RETENTION_DAYS", defaults.dedup_retention_days)?,
            max_signals_per_run: parsed("MAX_SIGNALS_PER_RUN", defaults.max_signals_per_run)?,
            volume_min: parsed("VOLUME_MIN", defaults.volume_min)?,
            volume_max: parsed("VOLUME_MAX", defaults.volume_max)?,
            filter_interval: env::var("FILTER_INTERVAL").unwrap_or(defaults.filter_interval),
            filter_limit: parsed("FILTER_LIMIT", defaults.filter_limit)?,
            sideways_threshold: parsed("SIDEWAYS_THRESHOLD", defaults.sideways_threshold)?,
            volatility_threshold: parsed("VOLATILITY_THRESHOLD", defaults.volatility_threshold)?,
            base_interval: env::var("BASE_INTERVAL").unwrap_or(defaults.base_interval),
            base_limit: parsed("BASE_LIMIT", defaults.base_limit)?,
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            leverage_search: env::var("LEVERAGE_SEARCH")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.leverage_search),
            leverage_min: parsed("LEVERAGE_MIN", defaults.leverage_min)?,
            leverage_max: parsed("LEVERAGE_MAX", defaults.leverage_max)?,
        })
    }
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T, EngineError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| EngineError::Config(format!("invalid {}: '{}'", key, raw))),
        Err(_) => Ok(default),
    }
}
