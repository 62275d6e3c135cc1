//! Cumulative volume indicators: OBV, VWAP
//!
//! Both run from the first point of the slice they are given. A point
//! without volume contributes zero volume.

use super::{require, IndicatorError, IndicatorResult};
use crate::models::PricePoint;

/// On-balance volume at the latest point
pub fn obv(points: &[PricePoint]) -> IndicatorResult<f64> {
    require("obv", 1, 1, points.len())?;

    let total = points.windows(2).fold(0.0, |acc, pair| {
        let volume = pair[1].volume.unwrap_or(0.0);
        if pair[1].close > pair[0].close {
            acc + volume
        } else if pair[1].close < pair[0].close {
            acc - volume
        } else {
            acc
        }
    });
    Ok(total)
}

/// Volume-weighted average of the typical price since the first point
pub fn vwap(points: &[PricePoint]) -> IndicatorResult<f64> {
    require("vwap", 1, 1, points.len())?;

    let (weighted, volume) = points.iter().fold((0.0, 0.0), |(weighted, volume), point| {
        let v = point.volume.unwrap_or(0.0);
        (weighted + point.typical_price() * v, volume + v)
    });

    if volume <= 0.0 {
        return Err(IndicatorError::ZeroVolume { indicator: "vwap" });
    }
    Ok(weighted / volume)
}
