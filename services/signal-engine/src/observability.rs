//! Structured logging for pipeline stages

/// Structured logger for consistent event fields
pub struct Logger;

impl Logger {
    /// Log a structured event
    pub fn event(level: tracing::Level, component: &str, event: &str, attributes: &[(&str, &str)]) {
        let attrs = attributes
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ");

        match level {
            tracing::Level::ERROR => tracing::error!(component, event, %attrs),
            tracing::Level::WARN => tracing::warn!(component, event, %attrs),
            tracing::Level::INFO => tracing::info!(component, event, %attrs),
            tracing::Level::DEBUG => tracing::debug!(component, event, %attrs),
            _ => tracing::trace!(component, event, %attrs),
        }
    }

    /// Log completion of one pipeline stage for an asset
    pub fn stage_event(asset: &str, stage: &str, details: &str) {
        tracing::debug!(
            asset = %asset,
            stage = %stage,
            details = %details,
            "stage_event"
        );
    }

    /// Log a built trade plan
    pub fn plan_event(asset: &str, preset: &str, side: &str, size: &str) {
        tracing::info!(
            asset = %asset,
            preset = %preset,
            side = %side,
            size = %size,
            "plan_event"
        );
    }

    /// Log a request the engine refused
    pub fn rejection(asset: &str, reason: &str) {
        tracing::warn!(asset = %asset, reason = %reason, "request_rejected");
    }
}

/// Stage names used in `stage_event`
pub mod stages {
    pub const INDICATORS: &str = "indicators";
    pub const INSIGHT: &str = "insight";
    pub const VOTES: &str = "votes";
    pub const CONSENSUS: &str = "consensus";
    pub const PLAN: &str = "plan";
}
