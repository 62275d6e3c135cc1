//! Signal scorer - turns an indicator snapshot into an insight record
//!
//! Evidence comes from a fixed, versioned rule table. Each rule looks at one
//! indicator and, when it triggers, adds its weight to the bullish or bearish
//! side. Rules are evaluated in table order, so the rationale list is the
//! same for the same snapshot every time.

use serde::{Deserialize, Serialize};

use crate::config::ScorerSettings;
use crate::indicators::IndicatorSnapshot;

/// Version tag of the rule table below
pub const RULESET_VERSION: &str = "v1";

/// |net evidence| that maps to confidence 100
const FULL_CONFIDENCE_EVIDENCE: f64 = 60.0;

/// ATR/close above this is high volatility
const HIGH_VOLATILITY: f64 = 0.05;
/// ATR/close below this is low volatility
const LOW_VOLATILITY: f64 = 0.015;

pub const INSUFFICIENT_DATA_TAG: &str = "insufficient data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

/// Coarse confidence label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    High,
    Moderate,
    Low,
}

impl ConfidenceBand {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 70.0 {
            ConfidenceBand::High
        } else if confidence >= 50.0 {
            ConfidenceBand::Moderate
        } else {
            ConfidenceBand::Low
        }
    }
}

/// Volatility note derived from ATR relative to price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskNote {
    HighVolatility,
    NormalVolatility,
    LowVolatility,
    /// ATR not available
    Unknown,
}

impl RiskNote {
    pub fn from_relative_atr(relative_atr: Option<f64>) -> Self {
        match relative_atr {
            Some(r) if r > HIGH_VOLATILITY => RiskNote::HighVolatility,
            Some(r) if r < LOW_VOLATILITY => RiskNote::LowVolatility,
            Some(_) => RiskNote::NormalVolatility,
            None => RiskNote::Unknown,
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            RiskNote::HighVolatility => "smaller size, wider stops, lower leverage",
            RiskNote::NormalVolatility => "keep standard risk allocation",
            RiskNote::LowVolatility => "monitor compression and breakout triggers",
            RiskNote::Unknown => "volatility unavailable, size conservatively",
        }
    }
}

/// Scored view of one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightRecord {
    pub asset: String,
    pub direction: Direction,
    /// 0 - 100
    pub confidence: f64,
    pub band: ConfidenceBand,
    /// Triggered evidence tags in rule-table order
    pub rationale: Vec<String>,
    pub risk_note: RiskNote,
    /// Suggested setup for the direction
    pub action: String,
    pub ruleset_version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Bullish,
    Bearish,
}

struct Rule {
    tag: &'static str,
    side: Side,
    weight: f64,
    check: fn(&IndicatorSnapshot, &ScorerSettings) -> bool,
}

const RULES: &[Rule] = &[
    Rule {
        tag: "oversold",
        side: Side::Bullish,
        weight: 25.0,
        check: |s, t| s.rsi.is_some_and(|r| r < t.rsi_oversold),
    },
    Rule {
        tag: "overbought",
        side: Side::Bearish,
        weight: 25.0,
        check: |s, t| s.rsi.is_some_and(|r| r > t.rsi_overbought),
    },
    Rule {
        tag: "momentum shift up",
        side: Side::Bullish,
        weight: 20.0,
        check: |s, _| match (s.macd_prev_histogram, s.macd) {
            (Some(prev), Some(m)) => prev < 0.0 && m.histogram > 0.0,
            _ => false,
        },
    },
    Rule {
        tag: "momentum shift down",
        side: Side::Bearish,
        weight: 20.0,
        check: |s, _| match (s.macd_prev_histogram, s.macd) {
            (Some(prev), Some(m)) => prev > 0.0 && m.histogram < 0.0,
            _ => false,
        },
    },
    Rule {
        tag: "below lower band",
        side: Side::Bullish,
        weight: 15.0,
        check: |s, _| match (s.close, s.bollinger) {
            (Some(close), Some(b)) => close < b.lower,
            _ => false,
        },
    },
    Rule {
        tag: "above upper band",
        side: Side::Bearish,
        weight: 15.0,
        check: |s, _| match (s.close, s.bollinger) {
            (Some(close), Some(b)) => close > b.upper,
            _ => false,
        },
    },
    Rule {
        tag: "ema uptrend",
        side: Side::Bullish,
        weight: 10.0,
        check: |s, _| match (s.ema_fast, s.ema_slow) {
            (Some(fast), Some(slow)) => fast > slow,
            _ => false,
        },
    },
    Rule {
        tag: "ema downtrend",
        side: Side::Bearish,
        weight: 10.0,
        check: |s, _| match (s.ema_fast, s.ema_slow) {
            (Some(fast), Some(slow)) => fast < slow,
            _ => false,
        },
    },
    Rule {
        tag: "stochastic oversold",
        side: Side::Bullish,
        weight: 10.0,
        check: |s, t| s.stochastic.is_some_and(|st| st.k < t.stochastic_oversold),
    },
    Rule {
        tag: "stochastic overbought",
        side: Side::Bearish,
        weight: 10.0,
        check: |s, t| s.stochastic.is_some_and(|st| st.k > t.stochastic_overbought),
    },
    Rule {
        tag: "above vwap",
        side: Side::Bullish,
        weight: 5.0,
        check: |s, _| match (s.close, s.vwap) {
            (Some(close), Some(vwap)) => close > vwap,
            _ => false,
        },
    },
    Rule {
        tag: "below vwap",
        side: Side::Bearish,
        weight: 5.0,
        check: |s, _| match (s.close, s.vwap) {
            (Some(close), Some(vwap)) => close < vwap,
            _ => false,
        },
    },
];

/// Deterministic rule-table scorer
#[derive(Debug, Clone, Default)]
pub struct SignalScorer {
    settings: ScorerSettings,
}

impl SignalScorer {
    pub fn new(settings: ScorerSettings) -> Self {
        Self { settings }
    }

    pub fn score(&self, asset: &str, snapshot: &IndicatorSnapshot) -> InsightRecord {
        let risk_note = RiskNote::from_relative_atr(snapshot.relative_atr());

        if snapshot.is_empty() {
            return InsightRecord {
                asset: asset.to_string(),
                direction: Direction::Neutral,
                confidence: 0.0,
                band: ConfidenceBand::Low,
                rationale: vec![INSUFFICIENT_DATA_TAG.to_string()],
                risk_note,
                action: action_for(Direction::Neutral).to_string(),
                ruleset_version: RULESET_VERSION.to_string(),
            };
        }

        let mut bullish = 0.0;
        let mut bearish = 0.0;
        let mut rationale = Vec::new();
        for rule in RULES {
            if (rule.check)(snapshot, &self.settings) {
                match rule.side {
                    Side::Bullish => bullish += rule.weight,
                    Side::Bearish => bearish += rule.weight,
                }
                rationale.push(rule.tag.to_string());
            }
        }

        let net: f64 = bullish - bearish;
        let direction = if net.abs() < self.settings.neutral_band {
            Direction::Neutral
        } else if net > 0.0 {
            Direction::Bullish
        } else {
            Direction::Bearish
        };
        let confidence = (net.abs() / FULL_CONFIDENCE_EVIDENCE * 100.0).clamp(0.0, 100.0);

        InsightRecord {
            asset: asset.to_string(),
            direction,
            confidence,
            band: ConfidenceBand::from_confidence(confidence),
            rationale,
            risk_note,
            action: action_for(direction).to_string(),
            ruleset_version: RULESET_VERSION.to_string(),
        }
    }
}

fn action_for(direction: Direction) -> &'static str {
    match direction {
        Direction::Bullish => "momentum long setup",
        Direction::Bearish => "defensive / mean-reversion watch",
        Direction::Neutral => "range trade / breakout watch",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{BollingerValue, MacdValue, StochasticValue};

    fn scorer() -> SignalScorer {
        SignalScorer::new(ScorerSettings::default())
    }

    #[test]
    fn test_empty_snapshot_is_neutral_with_tag() {
        let insight = scorer().score("BTC", &IndicatorSnapshot::default());
        assert_eq!(insight.direction, Direction::Neutral);
        assert_eq!(insight.confidence, 0.0);
        assert_eq!(insight.rationale, vec![INSUFFICIENT_DATA_TAG.to_string()]);
        assert_eq!(insight.risk_note, RiskNote::Unknown);
    }

    #[test]
    fn test_oversold_momentum_shift_is_bullish() {
        let snapshot = IndicatorSnapshot {
            close: Some(100.0),
            rsi: Some(22.0),
            macd: Some(MacdValue { line: 0.4, signal: 0.1, histogram: 0.3 }),
            macd_prev_histogram: Some(-0.2),
            ..Default::default()
        };
        let insight = scorer().score("ETH", &snapshot);
        assert_eq!(insight.direction, Direction::Bullish);
        assert_eq!(insight.rationale, vec!["oversold", "momentum shift up"]);
        // 45 / 60
        assert!((insight.confidence - 75.0).abs() < 1e-9);
        assert_eq!(insight.band, ConfidenceBand::High);
    }

    #[test]
    fn test_rationale_follows_table_order_not_weight() {
        let snapshot = IndicatorSnapshot {
            close: Some(90.0),
            ema_fast: Some(95.0),
            ema_slow: Some(100.0),
            bollinger: Some(BollingerValue { upper: 110.0, mid: 100.0, lower: 92.0 }),
            stochastic: Some(StochasticValue { k: 10.0, d: 12.0 }),
            vwap: Some(99.0),
            ..Default::default()
        };
        let insight = scorer().score("SOL", &snapshot);
        assert_eq!(
            insight.rationale,
            vec!["below lower band", "ema downtrend", "stochastic oversold", "below vwap"]
        );
        // bull 25, bear 15 -> net 10, not below the neutral band
        assert_eq!(insight.direction, Direction::Bullish);
    }

    #[test]
    fn test_small_net_is_neutral() {
        let snapshot = IndicatorSnapshot {
            close: Some(100.0),
            ema_fast: Some(101.0),
            ema_slow: Some(100.0),
            vwap: Some(100.5),
            ..Default::default()
        };
        let insight = scorer().score("BTC", &snapshot);
        assert_eq!(insight.direction, Direction::Neutral);
        assert_eq!(insight.band, ConfidenceBand::Low);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let snapshot = IndicatorSnapshot {
            close: Some(200.0),
            rsi: Some(90.0),
            macd: Some(MacdValue { line: -1.0, signal: 0.0, histogram: -1.0 }),
            macd_prev_histogram: Some(0.5),
            bollinger: Some(BollingerValue { upper: 150.0, mid: 120.0, lower: 90.0 }),
            ema_fast: Some(100.0),
            ema_slow: Some(110.0),
            stochastic: Some(StochasticValue { k: 95.0, d: 90.0 }),
            vwap: Some(250.0),
            ..Default::default()
        };
        let insight = scorer().score("BTC", &snapshot);
        assert_eq!(insight.direction, Direction::Bearish);
        assert_eq!(insight.confidence, 100.0);
    }

    #[test]
    fn test_risk_note_thresholds() {
        assert_eq!(RiskNote::from_relative_atr(Some(0.08)), RiskNote::HighVolatility);
        assert_eq!(RiskNote::from_relative_atr(Some(0.03)), RiskNote::NormalVolatility);
        assert_eq!(RiskNote::from_relative_atr(Some(0.01)), RiskNote::LowVolatility);
        assert_eq!(RiskNote::from_relative_atr(None), RiskNote::Unknown);
    }

    #[test]
    fn test_confidence_band() {
        assert_eq!(ConfidenceBand::from_confidence(70.0), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_confidence(50.0), ConfidenceBand::Moderate);
        assert_eq!(ConfidenceBand::from_confidence(49.9), ConfidenceBand::Low);
    }
}
