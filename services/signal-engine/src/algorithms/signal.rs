//! Bot votes - output from strategy bots

use serde::{Deserialize, Serialize};

use super::BotKind;

/// Directional lean of a vote or consensus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    /// Enter or hold a long position
    Long,
    /// Enter or hold a short position
    Short,
    /// No position
    Flat,
}

impl Bias {
    /// +1 for long, -1 for short, 0 for flat
    pub fn sign(&self) -> f64 {
        match self {
            Bias::Long => 1.0,
            Bias::Short => -1.0,
            Bias::Flat => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Bias::Long => "long",
            Bias::Short => "short",
            Bias::Flat => "flat",
        }
    }
}

impl std::fmt::Display for Bias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One bot's opinion on one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotVote {
    pub bot: BotKind,
    pub asset: String,
    pub bias: Bias,
    /// Conviction in [0, 1]; always 0 for a flat vote
    pub strength: f64,
    /// Short human-readable reason
    pub reason: String,
}

impl BotVote {
    /// Create a long vote
    pub fn long(bot: BotKind, asset: &str, strength: f64, reason: impl Into<String>) -> Self {
        Self::directional(bot, asset, Bias::Long, strength, reason.into())
    }

    /// Create a short vote
    pub fn short(bot: BotKind, asset: &str, strength: f64, reason: impl Into<String>) -> Self {
        Self::directional(bot, asset, Bias::Short, strength, reason.into())
    }

    /// Create a flat vote (no opinion)
    pub fn flat(bot: BotKind, asset: &str, reason: impl Into<String>) -> Self {
        Self {
            bot,
            asset: asset.to_string(),
            bias: Bias::Flat,
            strength: 0.0,
            reason: reason.into(),
        }
    }

    fn directional(bot: BotKind, asset: &str, bias: Bias, strength: f64, reason: String) -> Self {
        let strength = if strength.is_finite() {
            strength.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            bot,
            asset: asset.to_string(),
            bias,
            strength,
            reason,
        }
    }

    /// Signed contribution to the consensus score
    pub fn weighted(&self) -> f64 {
        self.bias.sign() * self.strength
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_is_clamped() {
        let vote = BotVote::long(BotKind::Trend, "BTC", 3.5, "gap");
        assert_eq!(vote.strength, 1.0);
        let vote = BotVote::short(BotKind::Breakout, "BTC", f64::NAN, "nan");
        assert_eq!(vote.strength, 0.0);
    }

    #[test]
    fn test_weighted_sign() {
        assert_eq!(BotVote::long(BotKind::Trend, "A", 0.5, "").weighted(), 0.5);
        assert_eq!(BotVote::short(BotKind::Trend, "A", 0.5, "").weighted(), -0.5);
        assert_eq!(BotVote::flat(BotKind::Trend, "A", "").weighted(), 0.0);
    }

    #[test]
    fn test_bias_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Bias::Long).unwrap(), "\"long\"");
        assert_eq!(Bias::Flat.to_string(), "flat");
    }
}
