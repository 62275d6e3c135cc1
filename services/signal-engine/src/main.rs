//! Demo runner: evaluates the fallback universe and prints reports and plans
//!
//! Environment:
//! - `SIGNAL_ENGINE_CONFIG`: optional settings file (TOML/YAML/JSON)
//! - `SIGNAL_ENGINE__<SECTION>__<KEY>`: settings overrides
//! - `PRESET`: strategy preset name (default "Intraday Alpha")
//! - `ACCOUNT_SIZE`: account size in quote currency (default 10000)
//! - `EXECUTION_MODE`: "paper" or "webhook" (default paper)
//! - `RUST_LOG`: log filter (default info)

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use signal_engine::execution::preset_by_name;
use signal_engine::fixtures;
use signal_engine::{
    EngineSettings, ExecutionMode, ExecutionPlanner, Logger, SignalPipeline, WebhookPayload,
};

const DEFAULT_PRESET: &str = "Intraday Alpha";
const DEFAULT_ACCOUNT_SIZE: &str = "10000";

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Signal Engine demo...");

    let config_path = std::env::var("SIGNAL_ENGINE_CONFIG").ok().map(PathBuf::from);
    let settings = EngineSettings::load(config_path.as_deref()).context("loading settings")?;

    let preset_name = std::env::var("PRESET").unwrap_or_else(|_| DEFAULT_PRESET.to_string());
    let preset = preset_by_name(&preset_name)?;

    let account_size = std::env::var("ACCOUNT_SIZE")
        .unwrap_or_else(|_| DEFAULT_ACCOUNT_SIZE.to_string());
    let account_size = Decimal::from_str(account_size.trim())
        .with_context(|| format!("ACCOUNT_SIZE '{account_size}' is not a number"))?;

    let mode = match std::env::var("EXECUTION_MODE") {
        Ok(raw) => raw.parse::<ExecutionMode>()?,
        Err(_) => ExecutionMode::default(),
    };

    let account_label = account_size.to_string();
    let mode_label = format!("{mode:?}");
    Logger::event(
        Level::INFO,
        "main",
        "configured",
        &[
            ("preset", preset.kind.name()),
            ("timeframe", preset.timeframe.as_str()),
            ("account_size", account_label.as_str()),
            ("mode", mode_label.as_str()),
        ],
    );

    let pipeline = SignalPipeline::new(settings)?;
    let universe = fixtures::fallback_universe()?;
    let planner = ExecutionPlanner::new(mode);
    let profile = preset.risk_profile(account_size);

    let reports = pipeline.evaluate_all(&universe);
    println!("{}", serde_json::to_string_pretty(&reports)?);

    let assets: Vec<&str> = universe.assets().collect();
    let portfolio = pipeline.plan_portfolio(&universe, &assets, &preset_name, &profile, &planner)?;
    println!("{}", serde_json::to_string_pretty(&portfolio)?);

    if planner.mode() == ExecutionMode::Webhook {
        let payloads: Vec<WebhookPayload> =
            portfolio.plans.iter().map(WebhookPayload::from).collect();
        println!("{}", serde_json::to_string_pretty(&payloads)?);
    }

    info!(
        assets = universe.len(),
        plans = portfolio.plans.len(),
        failures = portfolio.failures.len(),
        "Signal Engine demo finished"
    );
    Ok(())
}
