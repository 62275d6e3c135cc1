//! Strategy bots
//!
//! Three independent evaluators vote on each asset from the same indicator
//! snapshot. The set is closed: `BotKind` lists every bot, and its
//! declaration order is the evaluation order used everywhere votes are
//! collected or summed.

use serde::{Deserialize, Serialize};

use crate::config::BotSettings;
use crate::indicators::IndicatorSnapshot;
use crate::models::MarketSeries;

pub mod breakout;
pub mod consensus;
pub mod mean_reversion;
pub mod signal;
pub mod trend;

pub use breakout::BreakoutBot;
pub use consensus::{aggregate, ConsensusSignal};
pub use mean_reversion::MeanReversionBot;
pub use signal::{Bias, BotVote};
pub use trend::TrendBot;

/// Core bot trait - every strategy implements this
pub trait StrategyBot: Send + Sync {
    /// Which bot this is
    fn kind(&self) -> BotKind;

    /// Vote on the asset behind `series`. Never fails: missing indicators
    /// produce a flat vote.
    fn evaluate(&self, snapshot: &IndicatorSnapshot, series: &MarketSeries) -> BotVote;
}

/// Every strategy bot, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotKind {
    Trend,
    MeanReversion,
    Breakout,
}

/// Fixed order bots are run and their votes summed in
pub const EVALUATION_ORDER: [BotKind; 3] = [
    BotKind::Trend,
    BotKind::MeanReversion,
    BotKind::Breakout,
];

impl BotKind {
    pub fn name(&self) -> &'static str {
        match self {
            BotKind::Trend => "TrendBot",
            BotKind::MeanReversion => "MeanReversionBot",
            BotKind::Breakout => "BreakoutBot",
        }
    }
}

/// The full bot set
#[derive(Debug, Clone)]
pub struct BotSuite {
    trend: TrendBot,
    mean_reversion: MeanReversionBot,
    breakout: BreakoutBot,
}

impl BotSuite {
    pub fn new(settings: &BotSettings) -> Self {
        Self {
            trend: TrendBot::new(settings.trend_gap_scale),
            mean_reversion: MeanReversionBot::new(
                settings.reversion_rsi_oversold,
                settings.reversion_rsi_overbought,
                settings.reversion_min_strength,
            ),
            breakout: BreakoutBot::new(settings.breakout_lookback, settings.breakout_atr_scale),
        }
    }

    pub fn bot(&self, kind: BotKind) -> &dyn StrategyBot {
        match kind {
            BotKind::Trend => &self.trend,
            BotKind::MeanReversion => &self.mean_reversion,
            BotKind::Breakout => &self.breakout,
        }
    }

    /// One vote per bot, in evaluation order
    pub fn evaluate(&self, snapshot: &IndicatorSnapshot, series: &MarketSeries) -> Vec<BotVote> {
        EVALUATION_ORDER
            .iter()
            .map(|kind| self.bot(*kind).evaluate(snapshot, series))
            .collect()
    }
}

impl Default for BotSuite {
    fn default() -> Self {
        Self::new(&BotSettings::default())
    }
}
