//! Unit tests for the instrument pre-filters

use signalis::models::candle::Candle;
use signalis::services::filters::{filter_by_volume, is_highly_volatile, is_sideways};
use signalis::services::market_data::TickerInfo;

fn ticker(symbol: &str, volume_24h: f64) -> TickerInfo {
    TickerInfo {
        symbol: symbol.to_string(),
        volume_24h,
        last_price: 1.0,
    }
}

fn candle(high: f64, low: f64, close: f64) -> Candle {
    Candle::new(0, close, high, low, close, 1000.0)
}

#[test]
fn test_volume_band_is_inclusive() {
    let tickers = vec![
        ticker("THIN", 10_000_000.0),
        ticker("LOW_EDGE", 50_000_000.0),
        ticker("MID", 100_000_000.0),
        ticker("HIGH_EDGE", 300_000_000.0),
        ticker("HOT", 500_000_000.0),
    ];
    let kept = filter_by_volume(tickers, 50_000_000.0, 300_000_000.0);
    let symbols: Vec<&str> = kept.iter().map(|t| t.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["LOW_EDGE", "MID", "HIGH_EDGE"]);
}

#[test]
fn test_sideways_detection() {
    // Close range 0.5% of the minimum: below the 1% threshold.
    let flat: Vec<Candle> = (0..20)
        .map(|i| candle(100.6, 99.9, 100.0 + (i % 2) as f64 * 0.5))
        .collect();
    assert!(is_sideways(&flat, 0.01));

    // 5% range: clearly trending.
    let trending: Vec<Candle> = (0..20)
        .map(|i| candle(106.0, 99.0, 100.0 + i as f64 * 0.25))
        .collect();
    assert!(!is_sideways(&trending, 0.01));

    assert!(!is_sideways(&[], 0.01));
}

#[test]
fn test_volatility_detection() {
    // One candle spanning 10% trips the 6% threshold.
    let mut calm: Vec<Candle> = (0..20).map(|_| candle(101.0, 100.0, 100.5)).collect();
    assert!(!is_highly_volatile(&calm, 0.06));

    calm.push(candle(110.0, 100.0, 105.0));
    assert!(is_highly_volatile(&calm, 0.06));
}
