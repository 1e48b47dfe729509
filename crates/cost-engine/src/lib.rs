//! Cost estimation and advisory engine for cloud resource configurations
//!
//! This crate provides the core functionality for:
//! - Provider rate tables
//! - Linear cost estimation with an environment discount
//! - Threshold-based advisory rules over an estimate
//! - Billing-history summaries and recommendations
//! - Health checks and observability for serving layers

pub mod advisor;
pub mod billing;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod health;
pub mod models;
pub mod observability;
pub mod rates;

pub use advisor::{Advisory, RuleId, RuleSet, StoragePolicy};
pub use engine::{CostEngine, EstimateReport};
pub use error::{EngineError, Result};
pub use estimator::CostEstimator;
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{EngineMetrics, StructuredLogger};
pub use rates::{RateTable, RateVector};
