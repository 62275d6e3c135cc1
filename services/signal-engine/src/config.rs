//! Engine settings
//!
//! Every section deserializes with defaults, so an empty source produces the
//! standard parameter set (RSI 14, MACD 12/26/9, Bollinger 20/2, ...).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EngineError, Result};

/// Environment prefix for overrides, e.g. `SIGNAL_ENGINE__INDICATORS__RSI_PERIOD=21`
pub const ENV_PREFIX: &str = "SIGNAL_ENGINE";

/// Complete engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub indicators: IndicatorSettings,
    pub scorer: ScorerSettings,
    pub bots: BotSettings,
}

impl EngineSettings {
    /// Load settings from an optional file plus environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        let settings: EngineSettings = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.indicators.validate()?;
        self.scorer.validate()?;
        self.bots.validate()
    }
}

/// Indicator periods and parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub sma_period: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_k: f64,
    pub atr_period: usize,
    pub stochastic_period: usize,
    pub stochastic_smooth: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            sma_period: 20,
            ema_fast: 12,
            ema_slow: 26,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_k: 2.0,
            atr_period: 14,
            stochastic_period: 14,
            stochastic_smooth: 3,
        }
    }
}

impl IndicatorSettings {
    fn validate(&self) -> Result<()> {
        let periods = [
            ("sma period", self.sma_period),
            ("ema fast", self.ema_fast),
            ("ema slow", self.ema_slow),
            ("rsi period", self.rsi_period),
            ("macd fast", self.macd_fast),
            ("macd slow", self.macd_slow),
            ("macd signal", self.macd_signal),
            ("bollinger period", self.bollinger_period),
            ("atr period", self.atr_period),
            ("stochastic period", self.stochastic_period),
            ("stochastic smooth", self.stochastic_smooth),
        ];
        for (field, period) in periods {
            if period == 0 {
                return Err(EngineError::validation(field, "period must be at least 1"));
            }
        }
        if self.ema_fast >= self.ema_slow {
            return Err(EngineError::validation(
                "ema fast",
                format!("fast ({}) must be shorter than slow ({})", self.ema_fast, self.ema_slow),
            ));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(EngineError::validation(
                "macd fast",
                format!("fast ({}) must be shorter than slow ({})", self.macd_fast, self.macd_slow),
            ));
        }
        if !(self.bollinger_k > 0.0) {
            return Err(EngineError::validation("bollinger k", "multiplier must be positive"));
        }
        Ok(())
    }
}

/// Thresholds used by the insight rule table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerSettings {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub stochastic_oversold: f64,
    pub stochastic_overbought: f64,
    /// |net evidence| below this is neutral
    pub neutral_band: f64,
}

impl Default for ScorerSettings {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            stochastic_oversold: 20.0,
            stochastic_overbought: 80.0,
            neutral_band: 10.0,
        }
    }
}

impl ScorerSettings {
    fn validate(&self) -> Result<()> {
        if !(0.0..self.rsi_overbought).contains(&self.rsi_oversold) || self.rsi_overbought > 100.0 {
            return Err(EngineError::validation(
                "rsi thresholds",
                "expected 0 <= oversold < overbought <= 100",
            ));
        }
        if !(0.0..self.stochastic_overbought).contains(&self.stochastic_oversold)
            || self.stochastic_overbought > 100.0
        {
            return Err(EngineError::validation(
                "stochastic thresholds",
                "expected 0 <= oversold < overbought <= 100",
            ));
        }
        if self.neutral_band < 0.0 {
            return Err(EngineError::validation("neutral band", "must not be negative"));
        }
        Ok(())
    }
}

/// Strategy bot parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotSettings {
    /// Relative EMA gap that maps to full trend strength (0.02 = 2%)
    pub trend_gap_scale: f64,
    pub reversion_rsi_oversold: f64,
    pub reversion_rsi_overbought: f64,
    /// Floor applied to a triggered mean-reversion vote
    pub reversion_min_strength: f64,
    /// Prior points scanned for the breakout range and volume average
    pub breakout_lookback: usize,
    /// Breakout distance, in ATRs, that maps to full strength
    pub breakout_atr_scale: f64,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            trend_gap_scale: 0.02,
            reversion_rsi_oversold: 30.0,
            reversion_rsi_overbought: 70.0,
            reversion_min_strength: 0.1,
            breakout_lookback: 20,
            breakout_atr_scale: 1.0,
        }
    }
}

impl BotSettings {
    fn validate(&self) -> Result<()> {
        if !(self.trend_gap_scale > 0.0) {
            return Err(EngineError::validation("trend gap scale", "must be positive"));
        }
        if self.reversion_rsi_oversold >= self.reversion_rsi_overbought {
            return Err(EngineError::validation(
                "reversion rsi thresholds",
                "oversold must be below overbought",
            ));
        }
        if !(0.0..=1.0).contains(&self.reversion_min_strength) {
            return Err(EngineError::validation(
                "reversion min strength",
                "must be within [0, 1]",
            ));
        }
        if self.breakout_lookback == 0 {
            return Err(EngineError::validation("breakout lookback", "must be at least 1"));
        }
        if !(self.breakout_atr_scale > 0.0) {
            return Err(EngineError::validation("breakout atr scale", "must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let settings = EngineSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.indicators.rsi_period, 14);
        assert_eq!(settings.indicators.macd_signal, 9);
        assert_eq!(settings.bots.breakout_lookback, 20);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[indicators]\nrsi_period = 21\n\n[scorer]\nneutral_band = 5.0").unwrap();

        let settings = EngineSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.indicators.rsi_period, 21);
        assert_eq!(settings.indicators.ema_slow, 26);
        assert_eq!(settings.scorer.neutral_band, 5.0);
        assert_eq!(settings.bots, BotSettings::default());
    }

    #[test]
    fn test_load_rejects_inverted_ema_periods() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[indicators]\nema_fast = 30\nema_slow = 10").unwrap();

        let err = EngineSettings::load(Some(file.path())).unwrap_err();
        assert_eq!(err.field(), Some("ema fast"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            EngineSettings::load(Some(&missing)),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn test_zero_period_rejected() {
        let mut settings = EngineSettings::default();
        settings.indicators.atr_period = 0;
        assert_eq!(settings.validate().unwrap_err().field(), Some("atr period"));
    }
}
