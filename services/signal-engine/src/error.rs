//! Error types for the signal engine

use crate::indicators::IndicatorError;

/// Errors surfaced by the engine to its callers.
///
/// Insufficient data never reaches callers of the pipeline: the snapshot
/// stores a missing value instead. The `Indicator` variant is only returned
/// by code that asks the engine for a single indicator directly.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("asset not found: {0}")]
    UnknownAsset(String),

    #[error("settings error: {0}")]
    Config(#[from] ::config::ConfigError),
}

impl EngineError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Field named by a validation error, if this is one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            EngineError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
