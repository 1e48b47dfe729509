//! HTTP serving layer for the cost engine
//!
//! Exposes estimates, billing-history analysis and the rate table as JSON,
//! alongside health, readiness and Prometheus metrics endpoints.

pub mod api;
pub mod config;
