//! Webhook payload for downstream execution consumers
//!
//! The field names and JSON types here are a wire contract. Delivering the
//! payload is the consumer's concern; this module only builds it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::planner::TradePlan;
use crate::algorithms::Bias;

/// Flat JSON object mirroring a trade plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub asset: String,
    pub side: Bias,
    #[serde(with = "rust_decimal::serde::float")]
    pub entry: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub stop: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub target: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub size: Decimal,
    pub preset: String,
    /// RFC 3339, UTC
    pub generated_at: DateTime<Utc>,
}

impl From<&TradePlan> for WebhookPayload {
    fn from(plan: &TradePlan) -> Self {
        Self {
            asset: plan.asset.clone(),
            side: plan.side,
            entry: plan.entry,
            stop: plan.stop,
            target: plan.target,
            size: plan.size,
            preset: plan.preset.clone(),
            generated_at: plan.timestamp,
        }
    }
}

impl WebhookPayload {
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::planner::ExecutionMode;
    use chrono::TimeZone;

    fn plan() -> TradePlan {
        TradePlan {
            asset: "BTC".to_string(),
            side: Bias::Long,
            entry: Decimal::from(100),
            stop: Decimal::from(98),
            target: Decimal::from(104),
            size: Decimal::new(125, 1),
            risk_amount: Decimal::from(25),
            preset: "Intraday Alpha".to_string(),
            timeframe: "15m".to_string(),
            strength: 0.6,
            mode: ExecutionMode::Webhook,
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_payload_wire_shape() {
        let json = WebhookPayload::from(&plan()).to_json().unwrap();
        let object = json.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["asset", "entry", "generated_at", "preset", "side", "size", "stop", "target"]
        );
        assert_eq!(json["side"], "long");
        assert_eq!(json["entry"], 100.0);
        assert_eq!(json["size"], 12.5);
        assert_eq!(json["generated_at"], "2024-06-01T12:00:00Z");
    }

    #[test]
    fn test_payload_parses_back() {
        let payload = WebhookPayload::from(&plan());
        let text = serde_json::to_string(&payload).unwrap();
        let parsed: WebhookPayload = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, payload);
    }
}
