//! Indicator engine
//!
//! Pure functions over ordered price slices. Every function returns
//! `Err(IndicatorError)` instead of a value when the input is too short, and
//! none of them keep state between calls: each call re-evaluates the full
//! slice it is given.

pub mod momentum;
pub mod snapshot;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use momentum::{macd, macd_series, rsi, stochastic, MacdValue, StochasticValue};
pub use snapshot::IndicatorSnapshot;
pub use trend::{ema, ema_series, sma};
pub use volatility::{atr, bollinger_bands, true_range, BollingerValue};
pub use volume::{obv, vwap};

/// Why an indicator produced no value
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndicatorError {
    #[error("insufficient data for {indicator}: need {required} points, have {available}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    #[error("{indicator} requires {field} on every point")]
    MissingField {
        indicator: &'static str,
        field: &'static str,
    },

    #[error("{indicator} is undefined for zero cumulative volume")]
    ZeroVolume { indicator: &'static str },
}

pub type IndicatorResult<T> = std::result::Result<T, IndicatorError>;

/// Fail with `InsufficientData` unless `available >= required` and the period is usable
pub(crate) fn require(
    indicator: &'static str,
    period: usize,
    required: usize,
    available: usize,
) -> IndicatorResult<()> {
    if period == 0 || available < required {
        return Err(IndicatorError::InsufficientData {
            indicator,
            required: required.max(1),
            available,
        });
    }
    Ok(())
}
