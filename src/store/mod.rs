//! File-backed JSON state behind a small transactional-store abstraction.
//!
//! Every mutation is load-full, mutate, atomic-replace (write to a temp file
//! and rename over the original) so interleaved passes cannot leave a
//! half-written file behind. A missing or corrupt file is treated as empty
//! state with a warning, never a crash.

use crate::error::EngineError;
use crate::models::signal::SignalCandidate;
use crate::models::trade::{ClosedTrade, OpenTrade};
use crate::risk::RiskAssessment;
use chrono::{Duration, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::warn;

/// One JSON document on disk with atomic read-modify-write.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full document, recovering from a missing or malformed file
    /// by returning the empty state.
    pub fn load<T: DeserializeOwned + Default>(&self) -> T {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) if !raw.trim().is_empty() => raw,
            Ok(_) => return T::default(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "store unreadable, treating as empty");
                return T::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "store malformed, treating as empty");
                T::default()
            }
        }
    }

    /// Replace the document atomically.
    pub fn replace<T: Serialize>(&self, value: &T) -> Result<(), EngineError> {
        let raw = serde_json::to_string_pretty(value)
            .map_err(|e| EngineError::StateCorruption(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| EngineError::StateCorruption(e.to_string()))?;
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, raw).map_err(|e| EngineError::StateCorruption(e.to_string()))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| EngineError::StateCorruption(e.to_string()))?;
        Ok(())
    }

    /// Load-full, mutate, atomic-replace in one step.
    pub fn update<T, F>(&self, mutate: F) -> Result<T, EngineError>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T),
    {
        let mut state: T = self.load();
        mutate(&mut state);
        self.replace(&state)?;
        Ok(state)
    }
}

/// Open-trade collection keyed by signal id, plus the append-only
/// closed-trade log.
pub struct TradeStore {
    open: JsonStore,
    closed: JsonStore,
}

impl TradeStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            open: JsonStore::new(data_dir.join("open_trades.json")),
            closed: JsonStore::new(data_dir.join("trades_log.json")),
        }
    }

    pub fn open_trades(&self) -> BTreeMap<String, OpenTrade> {
        self.open.load()
    }

    /// Insert or replace the open trade for its signal id.
    pub fn put_open(&self, trade: OpenTrade) -> Result<(), EngineError> {
        self.open
            .update(|trades: &mut BTreeMap<String, OpenTrade>| {
                trades.insert(trade.signal_id.clone(), trade);
            })?;
        Ok(())
    }

    pub fn remove_open(&self, signal_id: &str) -> Result<Option<OpenTrade>, EngineError> {
        let mut removed = None;
        self.open
            .update(|trades: &mut BTreeMap<String, OpenTrade>| {
                removed = trades.remove(signal_id);
            })?;
        Ok(removed)
    }

    pub fn get_open(&self, signal_id: &str) -> Option<OpenTrade> {
        self.open_trades().get(signal_id).cloned()
    }

    pub fn append_closed(&self, record: ClosedTrade) -> Result<(), EngineError> {
        self.closed.update(|log: &mut Vec<ClosedTrade>| {
            log.push(record);
        })?;
        Ok(())
    }

    pub fn closed_trades(&self) -> Vec<ClosedTrade> {
        self.closed.load()
    }
}

/// One emission-log row per accepted signal, for the reporting layer and the
/// offline trainer's dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalRecord {
    pub candidate: SignalCandidate,
    pub risk: RiskAssessment,
}

pub struct SignalLog {
    store: JsonStore,
}

impl SignalLog {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            store: JsonStore::new(data_dir.join("signals_log.json")),
        }
    }

    pub fn append(&self, record: SignalRecord) -> Result<(), EngineError> {
        self.store.update(|log: &mut Vec<SignalRecord>| {
            log.push(record);
        })?;
        Ok(())
    }

    pub fn records(&self) -> Vec<SignalRecord> {
        self.store.load()
    }
}

/// Per-day set of symbols that already produced an accepted signal.
pub struct DedupStore {
    store: JsonStore,
}

impl DedupStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            store: JsonStore::new(data_dir.join("used_today.json")),
        }
    }

    fn day_key(date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    pub fn is_used(&self, date: NaiveDate, symbol: &str) -> bool {
        let state: BTreeMap<String, BTreeSet<String>> = self.store.load();
        state
            .get(&Self::day_key(date))
            .map(|set| set.contains(symbol))
            .unwrap_or(false)
    }

    pub fn mark_used(&self, date: NaiveDate, symbol: &str) -> Result<(), EngineError> {
        self.store
            .update(|state: &mut BTreeMap<String, BTreeSet<String>>| {
                state
                    .entry(Self::day_key(date))
                    .or_default()
                    .insert(symbol.to_string());
            })?;
        Ok(())
    }

    /// Drop day entries older than the retention window.
    pub fn prune(&self, retention_days: i64) -> Result<usize, EngineError> {
        let cutoff = Utc::now().date_naive() - Duration::days(retention_days);
        let mut pruned = 0;
        self.store
            .update(|state: &mut BTreeMap<String, BTreeSet<String>>| {
                let before = state.len();
                state.retain(|day, _| {
                    NaiveDate::parse_from_str(day, "%Y-%m-%d")
                        .map(|d| d >= cutoff)
                        .unwrap_or(false)
                });
                pruned = before - state.len();
            })?;
        Ok(pruned)
    }
}
