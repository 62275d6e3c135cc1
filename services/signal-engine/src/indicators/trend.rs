//! Moving averages: SMA, EMA

use super::{require, IndicatorResult};

/// Simple moving average of the last `period` values
pub fn sma(values: &[f64], period: usize) -> IndicatorResult<f64> {
    require("sma", period, period, values.len())?;
    let window = &values[values.len() - period..];
    Ok(window.iter().sum::<f64>() / period as f64)
}

/// Exponential moving average at the latest value
pub fn ema(values: &[f64], period: usize) -> IndicatorResult<f64> {
    let series = ema_series(values, period)?;
    // ema_series yields at least one value once the period is satisfied
    series.last().copied().ok_or(super::IndicatorError::InsufficientData {
        indicator: "ema",
        required: period,
        available: values.len(),
    })
}

/// EMA evaluated at every index from `period - 1` onwards.
///
/// Seeded with the SMA of the first `period` values, then
/// `ema = alpha * value + (1 - alpha) * ema` with `alpha = 2 / (period + 1)`.
/// MACD feeds this series back into itself, so the full path is returned
/// rather than only the last value.
pub fn ema_series(values: &[f64], period: usize) -> IndicatorResult<Vec<f64>> {
    require("ema", period, period, values.len())?;

    let alpha = 2.0 / (period as f64 + 1.0);
    let seed = values[..period].iter().sum::<f64>() / period as f64;

    let mut out = Vec::with_capacity(values.len() - period + 1);
    out.push(seed);
    let mut current = seed;
    for value in &values[period..] {
        current = alpha * value + (1.0 - alpha) * current;
        out.push(current);
    }
    Ok(out)
}
