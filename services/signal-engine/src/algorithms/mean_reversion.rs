//! Mean Reversion Bot
//!
//! Fades stretched prices:
//! - Long when RSI is oversold or price is at/below the lower Bollinger band
//! - Short when RSI is overbought or price is at/above the upper band
//! - Strength = the larger of the RSI and band overshoots, floored at `min_strength`

use super::{BotKind, BotVote, StrategyBot};
use crate::indicators::IndicatorSnapshot;
use crate::models::MarketSeries;

#[derive(Debug, Clone)]
pub struct MeanReversionBot {
    rsi_oversold: f64,
    rsi_overbought: f64,
    min_strength: f64,
}

/// Overshoot measured on each side, `None` when that side did not trigger
#[derive(Debug, Default)]
struct Stretch {
    long: Option<f64>,
    short: Option<f64>,
}

impl Stretch {
    fn add_long(&mut self, part: f64) {
        self.long = Some(self.long.map_or(part, |p| p.max(part)));
    }

    fn add_short(&mut self, part: f64) {
        self.short = Some(self.short.map_or(part, |p| p.max(part)));
    }
}

impl MeanReversionBot {
    pub fn new(rsi_oversold: f64, rsi_overbought: f64, min_strength: f64) -> Self {
        Self {
            rsi_oversold,
            rsi_overbought,
            min_strength,
        }
    }

    fn stretch(&self, snapshot: &IndicatorSnapshot) -> Stretch {
        let mut stretch = Stretch::default();

        if let Some(rsi) = snapshot.rsi {
            if rsi < self.rsi_oversold && self.rsi_oversold > 0.0 {
                stretch.add_long((self.rsi_oversold - rsi) / self.rsi_oversold);
            }
            if rsi > self.rsi_overbought && self.rsi_overbought < 100.0 {
                stretch.add_short((rsi - self.rsi_overbought) / (100.0 - self.rsi_overbought));
            }
        }

        if let (Some(close), Some(bands)) = (snapshot.close, snapshot.bollinger) {
            let width = bands.width();
            let relative = |distance: f64| if width > 0.0 { distance / width } else { 0.0 };
            if close <= bands.lower {
                stretch.add_long(relative(bands.lower - close));
            }
            if close >= bands.upper {
                stretch.add_short(relative(close - bands.upper));
            }
        }

        stretch
    }

    fn clamp(&self, part: f64) -> f64 {
        part.max(self.min_strength).min(1.0)
    }
}

impl StrategyBot for MeanReversionBot {
    fn kind(&self) -> BotKind {
        BotKind::MeanReversion
    }

    fn evaluate(&self, snapshot: &IndicatorSnapshot, series: &MarketSeries) -> BotVote {
        let asset = series.asset();
        if snapshot.rsi.is_none() && (snapshot.bollinger.is_none() || snapshot.close.is_none()) {
            return BotVote::flat(self.kind(), asset, "rsi and bands unavailable");
        }

        match self.stretch(snapshot) {
            Stretch {
                long: Some(part),
                short: None,
            } => BotVote::long(
                self.kind(),
                asset,
                self.clamp(part),
                "oversold, expecting reversion up",
            ),
            Stretch {
                long: None,
                short: Some(part),
            } => BotVote::short(
                self.kind(),
                asset,
                self.clamp(part),
                "overbought, expecting reversion down",
            ),
            Stretch {
                long: Some(_),
                short: Some(_),
            } => BotVote::flat(self.kind(), asset, "conflicting stretch"),
            Stretch {
                long: None,
                short: None,
            } => BotVote::flat(self.kind(), asset, "price inside normal range"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::Bias;
    use crate::indicators::BollingerValue;

    fn bot() -> MeanReversionBot {
        MeanReversionBot::new(30.0, 70.0, 0.1)
    }

    fn series() -> MarketSeries {
        MarketSeries::new("ETH", vec![]).unwrap()
    }

    fn bands() -> Option<BollingerValue> {
        Some(BollingerValue {
            upper: 110.0,
            mid: 100.0,
            lower: 90.0,
        })
    }

    #[test]
    fn test_oversold_rsi_votes_long() {
        let snapshot = IndicatorSnapshot {
            close: Some(95.0),
            rsi: Some(15.0),
            bollinger: bands(),
            ..Default::default()
        };
        let vote = bot().evaluate(&snapshot, &series());
        assert_eq!(vote.bias, Bias::Long);
        assert!((vote.strength - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_upper_band_votes_short_with_floor() {
        // 1 past the band on a width of 20 -> 0.05, floored at 0.1
        let snapshot = IndicatorSnapshot {
            close: Some(111.0),
            rsi: Some(60.0),
            bollinger: bands(),
            ..Default::default()
        };
        let vote = bot().evaluate(&snapshot, &series());
        assert_eq!(vote.bias, Bias::Short);
        assert!((vote.strength - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_takes_larger_overshoot() {
        // rsi part 5 / 30, band part 10 / 20
        let snapshot = IndicatorSnapshot {
            close: Some(80.0),
            rsi: Some(25.0),
            bollinger: bands(),
            ..Default::default()
        };
        let vote = bot().evaluate(&snapshot, &series());
        assert_eq!(vote.bias, Bias::Long);
        assert!((vote.strength - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_conflict_is_flat() {
        let snapshot = IndicatorSnapshot {
            close: Some(120.0),
            rsi: Some(10.0),
            bollinger: bands(),
            ..Default::default()
        };
        assert_eq!(bot().evaluate(&snapshot, &series()).bias, Bias::Flat);
    }

    #[test]
    fn test_missing_inputs_is_flat() {
        let vote = bot().evaluate(&IndicatorSnapshot::default(), &series());
        assert_eq!(vote.bias, Bias::Flat);
        assert_eq!(vote.strength, 0.0);
    }
}
