//! Market data records handed to the engine by the data-provider layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// One observation of an asset's market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    /// Required by ATR and Stochastic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    /// Required by ATR and Stochastic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
}

impl PricePoint {
    /// Close-only point (no volume, no range)
    pub fn new(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self {
            timestamp,
            close,
            volume: None,
            high: None,
            low: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_range(mut self, high: f64, low: f64) -> Self {
        self.high = Some(high);
        self.low = Some(low);
        self
    }

    /// (high + low + close) / 3, using close for a missing bound
    pub fn typical_price(&self) -> f64 {
        let high = self.high.unwrap_or(self.close);
        let low = self.low.unwrap_or(self.close);
        (high + low + self.close) / 3.0
    }

    fn validate(&self) -> Result<()> {
        if !self.close.is_finite() || self.close <= 0.0 {
            return Err(EngineError::validation(
                "close",
                format!("close must be a positive number, got {}", self.close),
            ));
        }
        for (field, value) in [("high", self.high), ("low", self.low), ("volume", self.volume)] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(EngineError::validation(
                        field,
                        format!("{field} must be a non-negative number, got {v}"),
                    ));
                }
            }
        }
        if let (Some(high), Some(low)) = (self.high, self.low) {
            if high < low {
                return Err(EngineError::validation(
                    "high",
                    format!("high {high} is below low {low}"),
                ));
            }
        }
        Ok(())
    }
}

/// Ordered price history for one asset.
///
/// Construction enforces ascending, duplicate-free timestamps and sane
/// prices (positive close, non-negative high/low/volume, high >= low); the
/// points cannot be mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSeries {
    asset: String,
    points: Vec<PricePoint>,
}

impl MarketSeries {
    pub fn new(asset: impl Into<String>, points: Vec<PricePoint>) -> Result<Self> {
        let asset = asset.into();
        if asset.trim().is_empty() {
            return Err(EngineError::validation("asset", "asset id must not be empty"));
        }

        for point in &points {
            point.validate()?;
        }

        for pair in points.windows(2) {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(EngineError::validation(
                    "timestamp",
                    format!(
                        "points must be strictly ascending ({} followed by {})",
                        pair[0].timestamp, pair[1].timestamp
                    ),
                ));
            }
        }

        Ok(Self { asset, points })
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }
}
