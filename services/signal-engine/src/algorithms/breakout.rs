//! Breakout Bot
//!
//! Detects price leaving its recent range:
//! - Range = highest high / lowest low over the `lookback` points before the latest
//! - Long when the latest close clears the range high, short when it breaks the low
//! - Volume confirmation required (latest volume above the lookback average)
//! - Strength = breakout distance in ATRs, scaled by `atr_scale` and capped at 1

use super::{BotKind, BotVote, StrategyBot};
use crate::indicators::IndicatorSnapshot;
use crate::models::{MarketSeries, PricePoint};

#[derive(Debug, Clone)]
pub struct BreakoutBot {
    lookback: usize,
    atr_scale: f64,
}

/// Range of the points preceding the latest one
#[derive(Debug, Clone, Copy, PartialEq)]
struct Range {
    high: f64,
    low: f64,
    avg_volume: f64,
}

impl BreakoutBot {
    pub fn new(lookback: usize, atr_scale: f64) -> Self {
        Self {
            lookback,
            atr_scale,
        }
    }

    /// Range of the prior `lookback` points; `None` without enough points or volume
    fn prior_range(&self, prior: &[PricePoint]) -> Option<Range> {
        if self.lookback == 0 || prior.len() < self.lookback {
            return None;
        }
        let window = &prior[prior.len() - self.lookback..];

        let mut high = f64::MIN;
        let mut low = f64::MAX;
        let mut volume = 0.0;
        for point in window {
            high = high.max(point.high.unwrap_or(point.close));
            low = low.min(point.low.unwrap_or(point.close));
            volume += point.volume?;
        }

        Some(Range {
            high,
            low,
            avg_volume: volume / self.lookback as f64,
        })
    }

    fn strength(&self, distance: f64, atr: f64) -> f64 {
        (distance / atr / self.atr_scale).min(1.0)
    }
}

impl StrategyBot for BreakoutBot {
    fn kind(&self) -> BotKind {
        BotKind::Breakout
    }

    fn evaluate(&self, snapshot: &IndicatorSnapshot, series: &MarketSeries) -> BotVote {
        let asset = series.asset();
        let points = series.points();
        let Some((latest, prior)) = points.split_last() else {
            return BotVote::flat(self.kind(), asset, "no price data");
        };

        let atr = match snapshot.atr {
            Some(atr) if atr > 0.0 && self.atr_scale > 0.0 => atr,
            _ => return BotVote::flat(self.kind(), asset, "atr unavailable"),
        };
        let (Some(range), Some(volume)) = (self.prior_range(prior), latest.volume) else {
            return BotVote::flat(self.kind(), asset, "range or volume unavailable");
        };

        if volume <= range.avg_volume {
            return BotVote::flat(self.kind(), asset, "volume not confirming");
        }

        if latest.close > range.high {
            return BotVote::long(
                self.kind(),
                asset,
                self.strength(latest.close - range.high, atr),
                format!("breakout above {:.2} on volume", range.high),
            );
        }

        if latest.close < range.low {
            return BotVote::short(
                self.kind(),
                asset,
                self.strength(range.low - latest.close, atr),
                format!("breakdown below {:.2} on volume", range.low),
            );
        }

        BotVote::flat(self.kind(), asset, "inside range")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::Bias;
    use chrono::{Duration, TimeZone, Utc};

    /// 20 points ranging 99..101 at volume 100, then one final point
    fn series(last_close: f64, last_volume: Option<f64>) -> MarketSeries {
        let start = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let mut points: Vec<PricePoint> = (0..20)
            .map(|i| {
                PricePoint::new(start + Duration::hours(i), 100.0)
                    .with_range(101.0, 99.0)
                    .with_volume(100.0)
            })
            .collect();
        let mut last = PricePoint::new(start + Duration::hours(20), last_close)
            .with_range(last_close + 0.5, last_close - 0.5);
        last.volume = last_volume;
        points.push(last);
        MarketSeries::new("SOL", points).unwrap()
    }

    fn snapshot(atr: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            atr: Some(atr),
            ..Default::default()
        }
    }

    #[test]
    fn test_breakout_up_with_volume() {
        let vote =
            BreakoutBot::new(20, 1.0).evaluate(&snapshot(4.0), &series(102.0, Some(150.0)));
        assert_eq!(vote.bias, Bias::Long);
        // 1 above the range high over an ATR of 4
        assert!((vote.strength - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_votes_short() {
        let vote = BreakoutBot::new(20, 1.0).evaluate(&snapshot(0.5), &series(97.0, Some(150.0)));
        assert_eq!(vote.bias, Bias::Short);
        assert_eq!(vote.strength, 1.0);
    }

    #[test]
    fn test_weak_volume_is_flat() {
        let vote = BreakoutBot::new(20, 1.0).evaluate(&snapshot(4.0), &series(102.0, Some(100.0)));
        assert_eq!(vote.bias, Bias::Flat);
    }

    #[test]
    fn test_missing_volume_or_atr_is_flat() {
        let bot = BreakoutBot::new(20, 1.0);
        assert_eq!(bot.evaluate(&snapshot(4.0), &series(102.0, None)).bias, Bias::Flat);
        let vote = bot.evaluate(&IndicatorSnapshot::default(), &series(102.0, Some(150.0)));
        assert_eq!(vote.bias, Bias::Flat);
        assert_eq!(vote.strength, 0.0);
    }

    #[test]
    fn test_short_history_is_flat() {
        let vote = BreakoutBot::new(30, 1.0).evaluate(&snapshot(4.0), &series(102.0, Some(150.0)));
        assert_eq!(vote.bias, Bias::Flat);
    }
}
