//! Execution planner - sizes a trade from a consensus signal
//!
//! Position size is risk-based: the amount risked per trade divided by the
//! distance from entry to stop. Nothing here talks to an exchange; the plan
//! is a record for the caller to render or hand to a webhook consumer.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::presets::preset_by_name;
use crate::algorithms::{Bias, ConsensusSignal};
use crate::error::{EngineError, Result};
use crate::observability::Logger;

/// Decimal places kept on position size
const SIZE_DECIMALS: u32 = 8;

/// Account risk settings supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub account_size: Decimal,
    /// Fraction of the account risked per trade, in (0, 1]
    pub risk_per_trade: Decimal,
    pub max_positions: u32,
    /// Percent of entry (2 = 2%)
    pub stop_loss_pct: Decimal,
    /// Percent of entry
    pub take_profit_pct: Decimal,
}

impl RiskProfile {
    pub fn validate(&self) -> Result<()> {
        if self.account_size <= Decimal::ZERO {
            return Err(EngineError::validation(
                "account size",
                format!("must be positive, got {}", self.account_size),
            ));
        }
        if self.risk_per_trade <= Decimal::ZERO || self.risk_per_trade > Decimal::ONE {
            return Err(EngineError::validation(
                "risk per trade",
                format!("must be within (0, 1], got {}", self.risk_per_trade),
            ));
        }
        if self.max_positions == 0 {
            return Err(EngineError::validation("max positions", "must be at least 1"));
        }
        if self.stop_loss_pct < Decimal::ZERO || self.stop_loss_pct >= Decimal::ONE_HUNDRED {
            return Err(EngineError::validation(
                "stop loss",
                format!("must be within [0, 100) percent, got {}", self.stop_loss_pct),
            ));
        }
        if self.take_profit_pct < Decimal::ZERO {
            return Err(EngineError::validation(
                "take profit",
                format!("must not be negative, got {}", self.take_profit_pct),
            ));
        }
        Ok(())
    }

    /// Amount of account currency risked on one trade
    pub fn risk_amount(&self) -> Result<Decimal> {
        self.account_size
            .checked_mul(self.risk_per_trade)
            .ok_or_else(|| EngineError::validation("account size", "risk amount overflows"))
    }
}

/// Where a plan is meant to go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Simulated only
    #[default]
    Paper,
    /// Payload prepared for a downstream webhook consumer
    Webhook,
}

impl FromStr for ExecutionMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paper" => Ok(ExecutionMode::Paper),
            "webhook" | "live-ready webhook" => Ok(ExecutionMode::Webhook),
            other => Err(EngineError::validation(
                "execution mode",
                format!("expected paper or webhook, got '{other}'"),
            )),
        }
    }
}

/// One sized trade (or an explicit no-trade) for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePlan {
    pub asset: String,
    pub side: Bias,
    pub entry: Decimal,
    pub stop: Decimal,
    pub target: Decimal,
    /// Units of the asset; zero for a flat plan
    pub size: Decimal,
    pub risk_amount: Decimal,
    pub preset: String,
    pub timeframe: String,
    /// Consensus strength the plan was built from
    pub strength: f64,
    pub mode: ExecutionMode,
    pub timestamp: DateTime<Utc>,
}

impl TradePlan {
    pub fn is_flat(&self) -> bool {
        self.side == Bias::Flat
    }
}

/// Builds trade plans for one execution mode
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionPlanner {
    mode: ExecutionMode,
}

impl ExecutionPlanner {
    pub fn new(mode: ExecutionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Plan a trade stamped with the current time
    pub fn plan(
        &self,
        preset: &str,
        profile: &RiskProfile,
        entry: Decimal,
        signal: &ConsensusSignal,
    ) -> Result<TradePlan> {
        self.plan_at(preset, profile, entry, signal, Utc::now())
    }

    /// Plan a trade stamped with `at`
    pub fn plan_at(
        &self,
        preset: &str,
        profile: &RiskProfile,
        entry: Decimal,
        signal: &ConsensusSignal,
        at: DateTime<Utc>,
    ) -> Result<TradePlan> {
        let result = self.build(preset, profile, entry, signal, at);
        match &result {
            Ok(plan) => Logger::plan_event(
                &plan.asset,
                &plan.preset,
                plan.side.as_str(),
                &plan.size.to_string(),
            ),
            Err(e) => Logger::rejection(&signal.asset, &e.to_string()),
        }
        result
    }

    fn build(
        &self,
        preset: &str,
        profile: &RiskProfile,
        entry: Decimal,
        signal: &ConsensusSignal,
        at: DateTime<Utc>,
    ) -> Result<TradePlan> {
        let preset = preset_by_name(preset)?;
        profile.validate()?;
        if entry <= Decimal::ZERO {
            return Err(EngineError::validation(
                "entry price",
                format!("must be positive, got {entry}"),
            ));
        }

        let risk_amount = profile.risk_amount()?;
        let mut plan = TradePlan {
            asset: signal.asset.clone(),
            side: Bias::Flat,
            entry,
            stop: entry,
            target: entry,
            size: Decimal::ZERO,
            risk_amount,
            preset: preset.kind.name().to_string(),
            timeframe: preset.timeframe.clone(),
            strength: signal.strength,
            mode: self.mode,
            timestamp: at,
        };

        if !signal.is_actionable(preset.min_strength) {
            return Ok(plan);
        }

        let stop_distance = percent_of(entry, profile.stop_loss_pct, "stop loss")?;
        let target_distance = percent_of(entry, profile.take_profit_pct, "take profit")?;
        if stop_distance.is_zero() {
            return Err(EngineError::validation(
                "stop loss",
                "zero stop distance leaves position size undefined",
            ));
        }

        let (stop, target) = match signal.bias {
            Bias::Long => (
                entry.checked_sub(stop_distance),
                entry.checked_add(target_distance),
            ),
            Bias::Short => (
                entry.checked_add(stop_distance),
                entry.checked_sub(target_distance),
            ),
            Bias::Flat => (Some(entry), Some(entry)),
        };
        let stop =
            stop.ok_or_else(|| EngineError::validation("stop loss", "stop price overflows"))?;
        let target = target
            .ok_or_else(|| EngineError::validation("take profit", "target price overflows"))?;
        let size = risk_amount.checked_div(stop_distance).ok_or_else(|| {
            EngineError::validation(
                "stop loss",
                format!("stop distance {stop_distance} is too small for risk amount {risk_amount}"),
            )
        })?;

        plan.side = signal.bias;
        plan.stop = stop;
        plan.target = target;
        plan.size = size.round_dp_with_strategy(SIZE_DECIMALS, RoundingStrategy::ToZero);
        Ok(plan)
    }
}

/// `pct` percent of `value`, or a validation error naming `field` on overflow
fn percent_of(value: Decimal, pct: Decimal, field: &'static str) -> Result<Decimal> {
    value
        .checked_mul(pct)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(|| EngineError::validation(field, format!("{pct}% of {value} overflows")))
}
