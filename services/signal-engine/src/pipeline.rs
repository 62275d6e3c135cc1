//! Pipeline orchestration
//!
//! `SignalPipeline` runs indicators -> insight -> bot votes -> consensus for
//! one series at a time. `MarketUniverse` is the per-asset series set the
//! pipeline reads from. Every asset is evaluated independently: nothing
//! computed for one asset is visible while evaluating another.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::algorithms::{aggregate, BotSuite, BotVote, ConsensusSignal};
use crate::config::EngineSettings;
use crate::error::{EngineError, Result};
use crate::execution::{preset_by_name, ExecutionPlanner, RiskProfile, TradePlan};
use crate::indicators::IndicatorSnapshot;
use crate::insights::{InsightRecord, SignalScorer};
use crate::models::MarketSeries;
use crate::observability::{stages, Logger};

/// Everything the pipeline derives for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetReport {
    pub asset: String,
    pub snapshot: IndicatorSnapshot,
    pub insight: InsightRecord,
    /// One vote per bot, in evaluation order
    pub votes: Vec<BotVote>,
    pub consensus: ConsensusSignal,
}

/// Series set keyed by asset id
#[derive(Debug, Clone, Default)]
pub struct MarketUniverse {
    series: BTreeMap<String, MarketSeries>,
}

impl MarketUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list of series; a repeated asset id is rejected
    pub fn from_series(series: impl IntoIterator<Item = MarketSeries>) -> Result<Self> {
        let mut universe = Self::new();
        for s in series {
            if universe.series.contains_key(s.asset()) {
                return Err(EngineError::validation(
                    "asset",
                    format!("duplicate series for {}", s.asset()),
                ));
            }
            universe.insert(s);
        }
        Ok(universe)
    }

    /// Add or replace the series for its asset
    pub fn insert(&mut self, series: MarketSeries) {
        self.series.insert(series.asset().to_string(), series);
    }

    pub fn get(&self, asset: &str) -> Result<&MarketSeries> {
        self.series
            .get(asset)
            .ok_or_else(|| EngineError::UnknownAsset(asset.to_string()))
    }

    /// Asset ids in sorted order
    pub fn assets(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Result of planning a batch of assets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioPlan {
    pub preset: String,
    /// Ranked by consensus strength, at most `max_positions` entries
    pub plans: Vec<TradePlan>,
    /// Requested assets that could not be evaluated or planned
    pub failures: Vec<AssetFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetFailure {
    pub asset: String,
    pub reason: String,
}

/// Signal pipeline for a fixed settings set
#[derive(Debug, Clone)]
pub struct SignalPipeline {
    settings: EngineSettings,
    scorer: SignalScorer,
    bots: BotSuite,
}

impl SignalPipeline {
    pub fn new(settings: EngineSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            scorer: SignalScorer::new(settings.scorer.clone()),
            bots: BotSuite::new(&settings.bots),
            settings,
        })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Run every stage for one series
    pub fn evaluate(&self, series: &MarketSeries) -> AssetReport {
        let asset = series.asset();

        let snapshot = IndicatorSnapshot::compute(series, &self.settings.indicators);
        Logger::stage_event(asset, stages::INDICATORS, &format!("{} points", series.len()));

        let insight = self.scorer.score(asset, &snapshot);
        Logger::stage_event(
            asset,
            stages::INSIGHT,
            &format!("{:?} {:.1}", insight.direction, insight.confidence),
        );

        let votes = self.bots.evaluate(&snapshot, series);
        Logger::stage_event(asset, stages::VOTES, &format!("{} votes", votes.len()));

        let consensus = aggregate(asset, &votes);
        Logger::stage_event(
            asset,
            stages::CONSENSUS,
            &format!("{} {:.3}", consensus.bias, consensus.strength),
        );

        AssetReport {
            asset: asset.to_string(),
            snapshot,
            insight,
            votes,
            consensus,
        }
    }

    pub fn evaluate_asset(&self, universe: &MarketUniverse, asset: &str) -> Result<AssetReport> {
        match universe.get(asset) {
            Ok(series) => Ok(self.evaluate(series)),
            Err(e) => {
                Logger::rejection(asset, &e.to_string());
                Err(e)
            }
        }
    }

    /// Report for every asset in the universe, sorted by asset id
    pub fn evaluate_all(&self, universe: &MarketUniverse) -> Vec<AssetReport> {
        universe
            .series
            .values()
            .map(|series| self.evaluate(series))
            .collect()
    }

    /// Plan a trade for one evaluated asset at its latest close.
    ///
    /// `series` must be the series `report` was evaluated from.
    pub fn plan(
        &self,
        report: &AssetReport,
        series: &MarketSeries,
        preset: &str,
        profile: &RiskProfile,
        planner: &ExecutionPlanner,
    ) -> Result<TradePlan> {
        if report.asset != series.asset() {
            return Err(EngineError::validation(
                "asset",
                format!(
                    "report for {} cannot be priced from {} series",
                    report.asset,
                    series.asset()
                ),
            ));
        }
        let entry = entry_price(series)?;
        planner.plan(preset, profile, entry, &report.consensus)
    }

    /// Evaluate and plan one asset from the universe
    pub fn plan_asset(
        &self,
        universe: &MarketUniverse,
        asset: &str,
        preset: &str,
        profile: &RiskProfile,
        planner: &ExecutionPlanner,
    ) -> Result<TradePlan> {
        let series = universe.get(asset)?;
        let report = self.evaluate(series);
        self.plan(&report, series, preset, profile, planner)
    }

    /// Plan the strongest actionable assets among `assets`.
    ///
    /// Actionable signals are ranked by consensus strength (ties by asset
    /// id) and at most `profile.max_positions` of them are planned. Unknown
    /// assets and per-asset planning errors are collected in `failures`;
    /// an invalid preset or profile rejects the whole request.
    pub fn plan_portfolio(
        &self,
        universe: &MarketUniverse,
        assets: &[&str],
        preset: &str,
        profile: &RiskProfile,
        planner: &ExecutionPlanner,
    ) -> Result<PortfolioPlan> {
        let strategy = preset_by_name(preset)?;
        profile.validate()?;

        let mut failures = Vec::new();
        let mut candidates = Vec::new();
        for asset in assets {
            match self.evaluate_asset(universe, asset) {
                Ok(report) if report.consensus.is_actionable(strategy.min_strength) => {
                    candidates.push(report)
                }
                Ok(report) => debug!(asset = %report.asset, "Not actionable under preset"),
                Err(e) => failures.push(AssetFailure {
                    asset: asset.to_string(),
                    reason: e.to_string(),
                }),
            }
        }

        candidates.sort_by(|a, b| {
            b.consensus
                .strength
                .total_cmp(&a.consensus.strength)
                .then_with(|| a.asset.cmp(&b.asset))
        });
        candidates.dedup_by(|a, b| a.asset == b.asset);

        let mut plans = Vec::new();
        for report in candidates.iter().take(profile.max_positions as usize) {
            let planned = universe
                .get(&report.asset)
                .and_then(|series| self.plan(report, series, preset, profile, planner));
            match planned {
                Ok(plan) => plans.push(plan),
                Err(e) => failures.push(AssetFailure {
                    asset: report.asset.clone(),
                    reason: e.to_string(),
                }),
            }
        }
        Logger::stage_event(
            "portfolio",
            stages::PLAN,
            &format!("{} plans, {} failures", plans.len(), failures.len()),
        );

        Ok(PortfolioPlan {
            preset: strategy.kind.name().to_string(),
            plans,
            failures,
        })
    }
}

impl Default for SignalPipeline {
    fn default() -> Self {
        let settings = EngineSettings::default();
        Self {
            scorer: SignalScorer::new(settings.scorer.clone()),
            bots: BotSuite::new(&settings.bots),
            settings,
        }
    }
}

fn entry_price(series: &MarketSeries) -> Result<Decimal> {
    let close = series
        .latest()
        .map(|p| p.close)
        .ok_or_else(|| EngineError::validation("entry price", "series has no price data"))?;
    Decimal::try_from(close).map_err(|e| {
        EngineError::validation("entry price", format!("{close} is not representable: {e}"))
    })
}
