//! Bot aggregator

use serde::{Deserialize, Serialize};

use super::{Bias, BotVote};

/// Scores this close to zero count as an exact tie
const TIE_EPSILON: f64 = 1e-12;

/// Combined view of every bot's vote on one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusSignal {
    pub asset: String,
    pub bias: Bias,
    /// Mean strength of the winning side, 0 when flat
    pub strength: f64,
    /// Signed sum of vote strengths
    pub score: f64,
    pub long_votes: usize,
    pub short_votes: usize,
    /// Contributing votes in evaluation order
    pub votes: Vec<BotVote>,
}

impl ConsensusSignal {
    /// Directional and at least `min_strength` strong
    pub fn is_actionable(&self, min_strength: f64) -> bool {
        self.bias != Bias::Flat && self.strength >= min_strength
    }
}

/// Combine the votes cast on one asset.
///
/// Votes are put into bot evaluation order before summing, so the result
/// does not depend on the order they arrive in.
pub fn aggregate(asset: &str, votes: &[BotVote]) -> ConsensusSignal {
    let mut votes = votes.to_vec();
    votes.sort_by_key(|v| v.bot);

    let score: f64 = votes.iter().map(BotVote::weighted).sum();
    let bias = if score > TIE_EPSILON {
        Bias::Long
    } else if score < -TIE_EPSILON {
        Bias::Short
    } else {
        Bias::Flat
    };

    let winning: Vec<f64> = votes
        .iter()
        .filter(|v| bias != Bias::Flat && v.bias == bias)
        .map(|v| v.strength)
        .collect();
    let strength = if winning.is_empty() {
        0.0
    } else {
        winning.iter().sum::<f64>() / winning.len() as f64
    };

    ConsensusSignal {
        asset: asset.to_string(),
        bias,
        strength,
        score,
        long_votes: votes.iter().filter(|v| v.bias == Bias::Long).count(),
        short_votes: votes.iter().filter(|v| v.bias == Bias::Short).count(),
        votes,
    }
}
