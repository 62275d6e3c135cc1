//! Execution planning: presets, risk-based sizing and the webhook payload

pub mod planner;
pub mod presets;
pub mod webhook;

pub use planner::{ExecutionMode, ExecutionPlanner, RiskProfile, TradePlan};
pub use presets::{get_preset, preset_by_name, PresetKind, StrategyPreset};
pub use webhook::WebhookPayload;
