//! Error types surfaced to callers of the simulation.

use thiserror::Error;

/// Failure to load or validate a [`SimConfig`](crate::config::SimConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Reasons the on-demand impact point query cannot produce an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ImpactError {
    #[error("missile is no longer alive")]
    MissileAbsent,

    #[error("missile is not moving")]
    NotMoving,

    #[error("vertical speed too small to estimate an impact")]
    InsufficientVerticalSpeed,

    #[error("missile is already at or below the ground")]
    AlreadyDown,
}
