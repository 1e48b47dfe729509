//! Error types for the cost engine
//!
//! Every error here is an input-validation failure raised before any
//! arithmetic runs, so callers never see a partially computed breakdown.
//! Binaries convert these into `anyhow::Error` at their boundary.

use thiserror::Error;

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, EngineError>;

/// Main error type for the cost engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Invalid request frequency: {0} (expected per-minute, per-hour or per-day)")]
    InvalidFrequency(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidRange {
        field: &'static str,
        message: String,
    },

    #[error("Invalid environment: {0} (expected production or development)")]
    InvalidEnvironment(String),

    #[error("Rate table error: {0}")]
    RateTable(String),

    #[error("Billing data error: {0}")]
    BillingData(String),
}

impl EngineError {
    /// Build an `InvalidRange` error for a named field
    pub fn invalid_range(field: &'static str, message: impl Into<String>) -> Self {
        EngineError::InvalidRange {
            field,
            message: message.into(),
        }
    }

    /// Stable, machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::UnknownProvider(_) => "unknown_provider",
            EngineError::InvalidFrequency(_) => "invalid_frequency",
            EngineError::InvalidRange { .. } => "invalid_range",
            EngineError::InvalidEnvironment(_) => "invalid_environment",
            EngineError::RateTable(_) => "rate_table",
            EngineError::BillingData(_) => "billing_data",
        }
    }
}
