//! Volatility indicators: Bollinger Bands, True Range, ATR

use serde::{Deserialize, Serialize};

use super::{require, IndicatorError, IndicatorResult};
use crate::models::PricePoint;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerValue {
    pub upper: f64,
    pub mid: f64,
    pub lower: f64,
}

impl BollingerValue {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Bollinger Bands over the trailing `period` values.
///
/// Uses the population standard deviation of the same window as the SMA.
pub fn bollinger_bands(values: &[f64], period: usize, k: f64) -> IndicatorResult<BollingerValue> {
    require("bollinger", period, period, values.len())?;

    let window = &values[values.len() - period..];
    let n = period as f64;
    let mid = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|v| (v - mid).powi(2)).sum::<f64>() / n;
    let band = k.abs() * variance.sqrt();

    Ok(BollingerValue {
        upper: mid + band,
        mid,
        lower: mid - band,
    })
}

/// max(high - low, |high - prev_close|, |low - prev_close|)
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    (high - low)
        .max((high - prev_close).abs())
        .max((low - prev_close).abs())
}

/// Average True Range with Wilder smoothing (alpha = 1/period)
pub fn atr(points: &[PricePoint], period: usize) -> IndicatorResult<f64> {
    require("atr", period, period + 1, points.len())?;

    let mut ranges = Vec::with_capacity(points.len() - 1);
    for pair in points.windows(2) {
        let (prev, point) = (&pair[0], &pair[1]);
        let high = point.high.ok_or(IndicatorError::MissingField {
            indicator: "atr",
            field: "high",
        })?;
        let low = point.low.ok_or(IndicatorError::MissingField {
            indicator: "atr",
            field: "low",
        })?;
        ranges.push(true_range(high, low, prev.close));
    }

    let n = period as f64;
    let seed = ranges[..period].iter().sum::<f64>() / n;
    Ok(ranges[period..]
        .iter()
        .fold(seed, |current, tr| (current * (n - 1.0) + tr) / n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn point(i: i64, close: f64, high: f64, low: f64) -> PricePoint {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        PricePoint::new(start + Duration::minutes(15 * i), close).with_range(high, low)
    }

    #[test]
    fn test_bollinger_known_window() {
        // mean 5, population stddev 2
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let bands = bollinger_bands(&values, 8, 2.0).unwrap();
        assert_eq!(bands.mid, 5.0);
        assert_eq!(bands.upper, 9.0);
        assert_eq!(bands.lower, 1.0);
        assert_eq!(bands.width(), 8.0);
    }

    #[test]
    fn test_bollinger_ordering_holds() {
        let values: Vec<f64> = (0..50).map(|i| 100.0 + ((i * 37) % 11) as f64).collect();
        let bands = bollinger_bands(&values, 20, 2.0).unwrap();
        assert!(bands.upper >= bands.mid && bands.mid >= bands.lower);

        let flat = bollinger_bands(&[3.0; 20], 20, 2.0).unwrap();
        assert_eq!(flat.upper, flat.lower);
    }

    #[test]
    fn test_bollinger_insufficient() {
        assert!(matches!(
            bollinger_bands(&[1.0; 5], 20, 2.0),
            Err(IndicatorError::InsufficientData { indicator: "bollinger", .. })
        ));
    }

    #[test]
    fn test_true_range_uses_gap_from_previous_close() {
        assert_eq!(true_range(12.0, 10.0, 11.0), 2.0);
        assert_eq!(true_range(12.0, 11.0, 8.0), 4.0);
        assert_eq!(true_range(12.0, 11.0, 15.0), 4.0);
    }

    #[test]
    fn test_atr_constant_range() {
        let points: Vec<PricePoint> = (0..20).map(|i| point(i, 100.0, 101.0, 99.0)).collect();
        assert!((atr(&points, 14).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_atr_wilder_step() {
        // period 2: TRs = 2, 3, 1 -> seed 2.5, then (2.5 + 1) / 2 = 1.75
        let points = vec![
            point(0, 10.0, 10.5, 9.5),
            point(1, 10.0, 11.0, 9.0),
            point(2, 12.0, 13.0, 11.0),
            point(3, 12.0, 12.5, 11.5),
        ];
        assert_eq!(atr(&points, 2).unwrap(), 1.75);
    }

    #[test]
    fn test_atr_requires_range() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let points: Vec<PricePoint> = (0..20)
            .map(|i| PricePoint::new(start + Duration::hours(i), 50.0))
            .collect();
        assert_eq!(
            atr(&points, 14).unwrap_err(),
            IndicatorError::MissingField { indicator: "atr", field: "high" }
        );
    }
}
