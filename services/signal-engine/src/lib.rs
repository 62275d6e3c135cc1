//! Signal Engine - crypto signal and execution pipeline
//!
//! 1. Computes technical indicators from an asset's price series
//! 2. Scores a deterministic insight from the indicator snapshot
//! 3. Runs the strategy bots and aggregates their votes
//! 4. Sizes a trade plan for a strategy preset and builds its webhook payload
//!
//! Everything here is synchronous and free of I/O. Market data comes in as
//! `MarketSeries` values; plans and payloads go out as plain records.

pub mod algorithms;
pub mod config;
pub mod error;
pub mod execution;
pub mod fixtures;
pub mod indicators;
pub mod insights;
pub mod models;
pub mod observability;
pub mod pipeline;


pub use algorithms::{aggregate, Bias, BotKind, BotSuite, BotVote, ConsensusSignal};
pub use crate::config::EngineSettings;
pub use error::{EngineError, Result};
pub use execution::{
    ExecutionMode, ExecutionPlanner, PresetKind, RiskProfile, StrategyPreset, TradePlan,
    WebhookPayload,
};
pub use indicators::{IndicatorError, IndicatorSnapshot};
pub use insights::{InsightRecord, SignalScorer};
pub use models::{MarketSeries, PricePoint};
pub use observability::Logger;
pub use pipeline::{AssetReport, MarketUniverse, PortfolioPlan, SignalPipeline};
