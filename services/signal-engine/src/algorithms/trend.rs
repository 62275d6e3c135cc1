//! Trend Following Bot
//!
//! Follows an established trend using the fast/slow EMA pair:
//! - Long when fast EMA > slow EMA and price is above both
//! - Short on the mirror condition
//! - Strength scales with the EMA gap relative to the slow EMA

use super::{BotKind, BotVote, StrategyBot};
use crate::indicators::IndicatorSnapshot;
use crate::models::MarketSeries;

#[derive(Debug, Clone)]
pub struct TrendBot {
    /// Relative gap that counts as full conviction
    gap_scale: f64,
}

impl TrendBot {
    pub fn new(gap_scale: f64) -> Self {
        Self { gap_scale }
    }

    fn strength(&self, fast: f64, slow: f64) -> f64 {
        if slow <= 0.0 || self.gap_scale <= 0.0 {
            return 0.0;
        }
        ((fast - slow).abs() / slow / self.gap_scale).min(1.0)
    }
}

impl StrategyBot for TrendBot {
    fn kind(&self) -> BotKind {
        BotKind::Trend
    }

    fn evaluate(&self, snapshot: &IndicatorSnapshot, series: &MarketSeries) -> BotVote {
        let asset = series.asset();
        let (close, fast, slow) = match (snapshot.close, snapshot.ema_fast, snapshot.ema_slow) {
            (Some(c), Some(f), Some(s)) => (c, f, s),
            _ => return BotVote::flat(self.kind(), asset, "ema pair unavailable"),
        };

        if fast > slow && close > fast {
            return BotVote::long(
                self.kind(),
                asset,
                self.strength(fast, slow),
                format!("uptrend: price {close:.2} above ema {fast:.2} > {slow:.2}"),
            );
        }

        if fast < slow && close < fast {
            return BotVote::short(
                self.kind(),
                asset,
                self.strength(fast, slow),
                format!("downtrend: price {close:.2} below ema {fast:.2} < {slow:.2}"),
            );
        }

        BotVote::flat(self.kind(), asset, "no aligned trend")
    }
}
