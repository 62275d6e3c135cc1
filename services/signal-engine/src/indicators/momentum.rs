//! Momentum indicators: RSI, MACD, Stochastic

use serde::{Deserialize, Serialize};

use super::trend::ema_series;
use super::{require, IndicatorError, IndicatorResult};
use crate::models::PricePoint;

/// MACD line, signal line and histogram at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdValue {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Stochastic oscillator (%K, %D), both within [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticValue {
    pub k: f64,
    pub d: f64,
}

/// Relative Strength Index with Wilder smoothing.
///
/// RSI = 100 - 100 / (1 + avg_gain / avg_loss); 100 when avg_loss is zero.
pub fn rsi(closes: &[f64], period: usize) -> IndicatorResult<f64> {
    require("rsi", period, period + 1, closes.len())?;

    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);
    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let n = period as f64;
    let mut avg_gain = gains[..period].iter().sum::<f64>() / n;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / n;
    for (gain, loss) in gains[period..].iter().zip(&losses[period..]) {
        avg_gain = (avg_gain * (n - 1.0) + gain) / n;
        avg_loss = (avg_loss * (n - 1.0) + loss) / n;
    }

    if avg_loss == 0.0 {
        return Ok(100.0);
    }

    let rs = avg_gain / avg_loss;
    Ok((100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0))
}

/// MACD at every index where the signal line is defined (oldest first)
pub fn macd_series(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> IndicatorResult<Vec<MacdValue>> {
    let longest = fast.max(slow);
    let required = longest + signal.saturating_sub(1);
    require("macd", fast.min(slow).min(signal), required, closes.len())?;

    let fast_ema = ema_series(closes, fast)?;
    let slow_ema = ema_series(closes, slow)?;

    // Align both EMA paths on the index where the longer one starts.
    let line: Vec<f64> = (longest - 1..closes.len())
        .map(|i| fast_ema[i + 1 - fast] - slow_ema[i + 1 - slow])
        .collect();

    let signal_line = ema_series(&line, signal)?;
    let offset = signal - 1;
    Ok(signal_line
        .iter()
        .enumerate()
        .map(|(i, signal_value)| {
            let line_value = line[i + offset];
            MacdValue {
                line: line_value,
                signal: *signal_value,
                histogram: line_value - signal_value,
            }
        })
        .collect())
}

/// MACD at the latest point
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> IndicatorResult<MacdValue> {
    let series = macd_series(closes, fast, slow, signal)?;
    series.last().copied().ok_or(IndicatorError::InsufficientData {
        indicator: "macd",
        required: fast.max(slow) + signal.saturating_sub(1),
        available: closes.len(),
    })
}

/// Stochastic oscillator over `period` points, %D smoothed over `smooth` %K values.
///
/// A window with no range (highest high == lowest low) reads as 50.
pub fn stochastic(
    points: &[PricePoint],
    period: usize,
    smooth: usize,
) -> IndicatorResult<StochasticValue> {
    let required = period + smooth.saturating_sub(1);
    require("stochastic", period.min(smooth), required, points.len())?;

    let used = &points[points.len() - required..];
    let mut highs = Vec::with_capacity(used.len());
    let mut lows = Vec::with_capacity(used.len());
    for point in used {
        highs.push(point.high.ok_or(IndicatorError::MissingField {
            indicator: "stochastic",
            field: "high",
        })?);
        lows.push(point.low.ok_or(IndicatorError::MissingField {
            indicator: "stochastic",
            field: "low",
        })?);
    }

    let k_values: Vec<f64> = (period - 1..used.len())
        .map(|end| {
            let start = end + 1 - period;
            let highest = highs[start..=end].iter().copied().fold(f64::MIN, f64::max);
            let lowest = lows[start..=end].iter().copied().fold(f64::MAX, f64::min);
            let range = highest - lowest;
            if range <= 0.0 {
                50.0
            } else {
                (100.0 * (used[end].close - lowest) / range).clamp(0.0, 100.0)
            }
        })
        .collect();

    let k = k_values.last().copied().unwrap_or(50.0);
    let d = k_values.iter().sum::<f64>() / k_values.len() as f64;
    Ok(StochasticValue { k, d })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn ranged(closes: &[f64]) -> Vec<PricePoint> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, c)| {
                PricePoint::new(start + Duration::hours(i as i64), *c).with_range(c + 1.0, c - 1.0)
            })
            .collect()
    }

    #[test]
    fn test_rsi_needs_period_plus_one() {
        let err = rsi(&[1.0, 2.0, 3.0], 14).unwrap_err();
        assert!(matches!(
            err,
            IndicatorError::InsufficientData { indicator: "rsi", required: 15, available: 3 }
        ));
    }

    #[test]
    fn test_rsi_all_gains_is_100() {
        let closes: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        assert_eq!(rsi(&closes, 14).unwrap(), 100.0);
    }

    #[test]
    fn test_rsi_all_losses_is_0() {
        let closes: Vec<f64> = (1..=20).rev().map(|i| i as f64).collect();
        assert_eq!(rsi(&closes, 14).unwrap(), 0.0);
    }

    #[test]
    fn test_rsi_wilder_smoothing() {
        // period 2: changes +2, -1, +1
        // seed: gain 1.0, loss 0.5; step: gain (1.0 + 1) / 2 = 1.0, loss 0.25
        let rsi_value = rsi(&[10.0, 12.0, 11.0, 12.0], 2).unwrap();
        assert!((rsi_value - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_bounded_on_zigzag() {
        let closes: Vec<f64> = (0..80)
            .map(|i| {
                let step = if i % 2 == 0 { 3.0 } else { -2.5 };
                100.0 + step * (i % 7) as f64
            })
            .collect();
        let value = rsi(&closes, 14).unwrap();
        assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn test_macd_constant_series_is_zero() {
        let closes = vec![42.0; 40];
        let m = macd(&closes, 12, 26, 9).unwrap();
        assert!(m.line.abs() < 1e-9);
        assert!(m.signal.abs() < 1e-9);
        assert!(m.histogram.abs() < 1e-9);
    }

    #[test]
    fn test_macd_minimum_length() {
        let closes: Vec<f64> = (0..33).map(|i| i as f64).collect();
        assert!(macd(&closes, 12, 26, 9).is_err());
        let closes: Vec<f64> = (0..34).map(|i| i as f64).collect();
        let series = macd_series(&closes, 12, 26, 9).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_macd_rising_series_is_positive() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 1.5).collect();
        let m = macd(&closes, 12, 26, 9).unwrap();
        assert!(m.line > 0.0);
        assert!((m.histogram - (m.line - m.signal)).abs() < 1e-12);
    }

    #[test]
    fn test_stochastic_bounds_and_top_of_range() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let points = ranged(&closes);
        let value = stochastic(&points, 14, 3).unwrap();
        assert!((0.0..=100.0).contains(&value.k));
        assert!((0.0..=100.0).contains(&value.d));
        assert!(value.k > 90.0);
    }

    #[test]
    fn test_stochastic_flat_window_reads_50() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let points: Vec<PricePoint> = (0..16)
            .map(|i| PricePoint::new(start + Duration::hours(i), 10.0).with_range(10.0, 10.0))
            .collect();
        let value = stochastic(&points, 14, 3).unwrap();
        assert_eq!(value.k, 50.0);
        assert_eq!(value.d, 50.0);
    }

    #[test]
    fn test_stochastic_requires_high_low() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let points: Vec<PricePoint> = (0..20)
            .map(|i| PricePoint::new(start + Duration::hours(i), 10.0 + i as f64))
            .collect();
        assert_eq!(
            stochastic(&points, 14, 3).unwrap_err(),
            IndicatorError::MissingField { indicator: "stochastic", field: "high" }
        );
    }
}
