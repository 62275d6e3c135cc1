//! Strategy presets
//!
//! A preset bundles the timeframe, default risk parameters and the minimum
//! consensus strength a signal needs before the planner will size a trade.
//! Users pick a preset by name; the numbers behind it are fixed here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::planner::RiskProfile;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PresetKind {
    #[serde(rename = "Scalp Pro")]
    ScalpPro,
    #[serde(rename = "Intraday Alpha")]
    IntradayAlpha,
    #[serde(rename = "Swing Smart")]
    SwingSmart,
}

impl PresetKind {
    pub const ALL: [PresetKind; 3] = [
        PresetKind::ScalpPro,
        PresetKind::IntradayAlpha,
        PresetKind::SwingSmart,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PresetKind::ScalpPro => "Scalp Pro",
            PresetKind::IntradayAlpha => "Intraday Alpha",
            PresetKind::SwingSmart => "Swing Smart",
        }
    }
}

impl FromStr for PresetKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        PresetKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::validation("preset", format!("unknown preset '{wanted}'")))
    }
}

impl std::fmt::Display for PresetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters behind a preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyPreset {
    pub kind: PresetKind,
    /// Candle timeframe the preset is tuned for
    pub timeframe: String,
    /// Fraction of the account risked per trade (0.01 = 1%)
    pub risk_per_trade: Decimal,
    pub max_positions: u32,
    /// Percent of entry (2 = 2%)
    pub stop_loss_pct: Decimal,
    /// Percent of entry
    pub take_profit_pct: Decimal,
    /// Minimum consensus strength to trade
    pub min_strength: f64,
}

impl StrategyPreset {
    /// Default risk profile for this preset at the given account size
    pub fn risk_profile(&self, account_size: Decimal) -> RiskProfile {
        RiskProfile {
            account_size,
            risk_per_trade: self.risk_per_trade,
            max_positions: self.max_positions,
            stop_loss_pct: self.stop_loss_pct,
            take_profit_pct: self.take_profit_pct,
        }
    }
}

/// Get the parameters for a preset
pub fn get_preset(kind: PresetKind) -> StrategyPreset {
    match kind {
        PresetKind::ScalpPro => StrategyPreset {
            kind,
            timeframe: "5m".to_string(),
            risk_per_trade: Decimal::new(75, 4),
            max_positions: 6,
            stop_loss_pct: Decimal::new(11, 1),
            take_profit_pct: Decimal::new(22, 1),
            min_strength: 0.40,
        },
        PresetKind::IntradayAlpha => StrategyPreset {
            kind,
            timeframe: "15m".to_string(),
            risk_per_trade: Decimal::new(1, 2),
            max_positions: 4,
            stop_loss_pct: Decimal::new(18, 1),
            take_profit_pct: Decimal::new(36, 1),
            min_strength: 0.30,
        },
        PresetKind::SwingSmart => StrategyPreset {
            kind,
            timeframe: "4h".to_string(),
            risk_per_trade: Decimal::new(125, 4),
            max_positions: 3,
            stop_loss_pct: Decimal::new(40, 1),
            take_profit_pct: Decimal::new(90, 1),
            min_strength: 0.20,
        },
    }
}

/// Look a preset up by display name (case-insensitive)
pub fn preset_by_name(name: &str) -> Result<StrategyPreset> {
    Ok(get_preset(name.parse()?))
}
