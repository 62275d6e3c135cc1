use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{
    atr, bollinger_bands, ema_series, macd_series, obv, rsi, sma, stochastic, vwap,
    BollingerValue, IndicatorResult, MacdValue, StochasticValue,
};
use crate::config::IndicatorSettings;
use crate::models::MarketSeries;

/// Latest value of every indicator for one series.
///
/// `None` marks an indicator that could not be computed (too few points,
/// missing high/low, no volume). Produced once per series state and never
/// mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub close: Option<f64>,
    pub sma: Option<f64>,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<MacdValue>,
    /// Histogram one point earlier, for crossing detection
    pub macd_prev_histogram: Option<f64>,
    pub bollinger: Option<BollingerValue>,
    pub atr: Option<f64>,
    pub stochastic: Option<StochasticValue>,
    pub obv: Option<f64>,
    pub vwap: Option<f64>,
}

impl IndicatorSnapshot {
    pub fn compute(series: &MarketSeries, settings: &IndicatorSettings) -> Self {
        let closes = series.closes();
        let points = series.points();
        let asset = series.asset();

        let macd_path = value(
            asset,
            macd_series(
                &closes,
                settings.macd_fast,
                settings.macd_slow,
                settings.macd_signal,
            ),
        );
        let (macd, macd_prev_histogram) = match macd_path.as_deref() {
            Some([.., prev, last]) => (Some(*last), Some(prev.histogram)),
            Some([last]) => (Some(*last), None),
            _ => (None, None),
        };

        Self {
            close: series.latest().map(|p| p.close),
            sma: value(asset, sma(&closes, settings.sma_period)),
            ema_fast: value(asset, ema_series(&closes, settings.ema_fast))
                .and_then(|s| s.last().copied()),
            ema_slow: value(asset, ema_series(&closes, settings.ema_slow))
                .and_then(|s| s.last().copied()),
            rsi: value(asset, rsi(&closes, settings.rsi_period)),
            macd,
            macd_prev_histogram,
            bollinger: value(
                asset,
                bollinger_bands(&closes, settings.bollinger_period, settings.bollinger_k),
            ),
            atr: value(asset, atr(points, settings.atr_period)),
            stochastic: value(
                asset,
                stochastic(points, settings.stochastic_period, settings.stochastic_smooth),
            ),
            obv: value(asset, obv(points)),
            vwap: value(asset, vwap(points)),
        }
    }

    /// True when no indicator produced a value
    pub fn is_empty(&self) -> bool {
        self.sma.is_none()
            && self.ema_fast.is_none()
            && self.ema_slow.is_none()
            && self.rsi.is_none()
            && self.macd.is_none()
            && self.bollinger.is_none()
            && self.atr.is_none()
            && self.stochastic.is_none()
            && self.obv.is_none()
            && self.vwap.is_none()
    }

    /// ATR as a fraction of the latest close
    pub fn relative_atr(&self) -> Option<f64> {
        match (self.atr, self.close) {
            (Some(atr), Some(close)) if close > 0.0 => Some(atr / close),
            _ => None,
        }
    }
}

fn value<T>(asset: &str, result: IndicatorResult<T>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            trace!(asset = %asset, reason = %e, "Indicator unavailable");
            None
        }
    }
}
