//! Canonical OHLCV candle plus normalization of raw provider records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One normalized OHLCV interval. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Interval open time in epoch milliseconds, strictly increasing per series.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Convert heterogeneous raw candle records into a sorted, de-duplicated
/// candle series.
///
/// Accepts positional arrays (`[ts, o, h, l, c, v, ...]`) and maps with
/// admissible alias keys per field. Field values may be numbers or numeric
/// strings (Bybit-style payloads use strings throughout). Records missing a
/// required field, or carrying a null or unparsable value, are dropped
/// silently: partial rows are routine upstream, not an error. Minimum-length
/// checks belong to the caller.
pub fn normalize_candles(raw: &[Value]) -> Vec<Candle> {
    let mut out: Vec<Candle> = raw.iter().filter_map(normalize_record).collect();
    out.sort_by_key(|c| c.timestamp);
    out.dedup_by_key(|c| c.timestamp);
    out
}

fn normalize_record(record: &Value) -> Option<Candle> {
    match record {
        Value::Array(fields) => {
            if fields.len() < 6 {
                return None;
            }
            Some(Candle::new(
                numeric(&fields[0])? as i64,
                numeric(&fields[1])?,
                numeric(&fields[2])?,
                numeric(&fields[3])?,
                numeric(&fields[4])?,
                numeric(&fields[5])?,
            ))
        }
        Value::Object(map) => {
            let ts = first_of(map, &["timestamp", "start", "open_time", "t"])?;
            Some(Candle::new(
                numeric(ts)? as i64,
                numeric(first_of(map, &["open", "o"])?)?,
                numeric(first_of(map, &["high", "h"])?)?,
                numeric(first_of(map, &["low", "l"])?)?,
                numeric(first_of(map, &["close", "c"])?)?,
                numeric(first_of(map, &["volume", "v", "vol"])?)?,
            ))
        }
        _ => None,
    }
}

fn first_of<'a>(
    map: &'a serde_json::Map<String, Value>,
    keys: &[&str],
) -> Option<&'a Value> {
    keys.iter()
        .find_map(|k| map.get(*k).filter(|v| !v.is_null()))
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
