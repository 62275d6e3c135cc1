//! Fallback market data
//!
//! Static, deterministic series used when no live provider is reachable.
//! They are ordinary `MarketSeries` values; nothing downstream can tell them
//! apart from provider data.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::error::{EngineError, Result};
use crate::models::{MarketSeries, PricePoint};
use crate::pipeline::MarketUniverse;

/// 2024-01-01T00:00:00Z
const FIXTURE_EPOCH: i64 = 1_704_067_200;

/// Hourly closes of the short BTC fallback series
pub const BTC_FALLBACK_CLOSES: [f64; 11] = [
    61000.0, 61800.0, 62300.0, 62000.0, 62800.0, 63500.0, 64000.0, 64500.0, 65200.0, 66100.0,
    67000.0,
];

fn epoch() -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(FIXTURE_EPOCH, 0)
        .single()
        .ok_or_else(|| EngineError::validation("timestamp", "fixture epoch out of range"))
}

/// Hourly bar with a +/-1% range
fn bar(start: DateTime<Utc>, index: usize, close: f64, volume: f64) -> PricePoint {
    PricePoint::new(start + Duration::hours(index as i64), close)
        .with_range(close * 1.01, close * 0.99)
        .with_volume(volume)
}

/// Short BTC series: 11 hourly bars, volume rising by 35 per bar
pub fn btc_fallback() -> Result<MarketSeries> {
    let start = epoch()?;
    let points = BTC_FALLBACK_CLOSES
        .iter()
        .enumerate()
        .map(|(i, close)| bar(start, i, *close, 1500.0 + 35.0 * i as f64))
        .collect();
    MarketSeries::new("BTC", points)
}

/// Long series with a steady drift and a deterministic wave.
///
/// The final bar jumps by `last_move` with triple volume, so the range
/// break at the end is visible to breakout logic.
pub fn synthetic(
    asset: &str,
    start_price: f64,
    bars: usize,
    drift: f64,
    last_move: f64,
) -> Result<MarketSeries> {
    let start = epoch()?;
    let mut points = Vec::with_capacity(bars);
    let mut close = start_price;
    for i in 0..bars {
        let wave = 0.004 * (i as f64 * 0.9).sin();
        let step = if i + 1 == bars { last_move } else { drift + wave };
        if i > 0 {
            close *= 1.0 + step;
        }
        let base_volume = 1000.0 + 40.0 * (i % 12) as f64;
        let volume = if i + 1 == bars {
            base_volume * 3.0
        } else {
            base_volume
        };
        points.push(bar(start, i, close, volume));
    }
    MarketSeries::new(asset, points)
}

/// BTC fallback plus a rising ETH and a falling SOL series
pub fn fallback_universe() -> Result<MarketUniverse> {
    MarketUniverse::from_series([
        btc_fallback()?,
        synthetic("ETH", 3200.0, 120, 0.004, 0.025)?,
        synthetic("SOL", 145.0, 120, -0.005, -0.03)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_btc_fallback_shape() {
        let series = btc_fallback().unwrap();
        assert_eq!(series.asset(), "BTC");
        assert_eq!(series.closes(), BTC_FALLBACK_CLOSES.to_vec());

        let first = &series.points()[0];
        assert_eq!(first.volume, Some(1500.0));
        assert_eq!(first.high, Some(61000.0 * 1.01));
        assert_eq!(series.latest().unwrap().volume, Some(1850.0));
    }

    #[test]
    fn test_synthetic_is_deterministic_and_ordered() {
        let a = synthetic("ETH", 100.0, 50, 0.01, 0.02).unwrap();
        let b = synthetic("ETH", 100.0, 50, 0.01, 0.02).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
        assert!(a.points().windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_fallback_universe_assets() {
        let universe = fallback_universe().unwrap();
        let assets: Vec<&str> = universe.assets().collect();
        assert_eq!(assets, vec!["BTC", "ETH", "SOL"]);
    }
}
