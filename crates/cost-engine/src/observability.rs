//! Observability infrastructure for cost engine front ends
//!
//! Provides:
//! - Prometheus metrics (estimate latency, estimate counts, rejected requests, advisories, billing records)
//! - Structured JSON logging with tracing
//!
//! The estimator and rule engine never call into this module themselves;
//! the serving layer records around each call.

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for estimate latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<EngineMetricsInner> = OnceLock::new();

struct EngineMetricsInner {
    estimate_latency_seconds: Histogram,
    estimates_total: IntCounter,
    request_errors: IntCounterVec,
    advisories_emitted: IntCounterVec,
    billing_reports_total: IntCounter,
    billing_records_analyzed: IntCounter,
    rate_table_providers: IntGauge,
}

impl EngineMetricsInner {
    fn new() -> Self {
        Self {
            estimate_latency_seconds: register_histogram!(
                "cost_engine_estimate_latency_seconds",
                "Time spent computing a cost estimate and its advisories",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register estimate_latency_seconds"),

            estimates_total: register_int_counter!(
                "cost_engine_estimates_total",
                "Total number of successful cost estimates"
            )
            .expect("Failed to register estimates_total"),

            request_errors: register_int_counter_vec!(
                "cost_engine_request_errors_total",
                "Total number of rejected requests by operation and error kind",
                &["operation", "kind"]
            )
            .expect("Failed to register request_errors"),

            advisories_emitted: register_int_counter_vec!(
                "cost_engine_advisories_emitted_total",
                "Total number of advisories emitted by rule",
                &["rule"]
            )
            .expect("Failed to register advisories_emitted"),

            billing_reports_total: register_int_counter!(
                "cost_engine_billing_reports_total",
                "Total number of billing-history reports produced"
            )
            .expect("Failed to register billing_reports_total"),

            billing_records_analyzed: register_int_counter!(
                "cost_engine_billing_records_analyzed_total",
                "Total number of billing records that passed the filter and were analyzed"
            )
            .expect("Failed to register billing_records_analyzed"),

            rate_table_providers: register_int_gauge!(
                "cost_engine_rate_table_providers",
                "Number of providers in the loaded rate table"
            )
            .expect("Failed to register rate_table_providers"),
        }
    }
}

/// Engine metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct EngineMetrics {
    _private: (),
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(EngineMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &EngineMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_estimate_latency(&self, duration_secs: f64) {
        self.inner().estimate_latency_seconds.observe(duration_secs);
    }

    pub fn inc_estimates(&self) {
        self.inner().estimates_total.inc();
    }

    /// Count a rejected request under its operation and error kind
    pub fn inc_request_errors(&self, operation: &str, kind: &str) {
        self.inner()
            .request_errors
            .with_label_values(&[operation, kind])
            .inc();
    }

    pub fn inc_advisory(&self, rule: &str) {
        self.inner()
            .advisories_emitted
            .with_label_values(&[rule])
            .inc();
    }

    /// Record one billing report covering `records` analyzed records
    pub fn record_billing_report(&self, records: usize) {
        self.inner().billing_reports_total.inc();
        self.inner()
            .billing_records_analyzed
            .inc_by(records as u64);
    }

    pub fn set_rate_table_providers(&self, count: i64) {
        self.inner().rate_table_providers.set(count);
    }
}

/// Structured logger for serving-layer events
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    /// Log a completed estimate
    pub fn log_estimate(
        &self,
        provider: &str,
        environment: &str,
        total_cost: f64,
        advisories: usize,
        rule_set_version: &str,
    ) {
        info!(
            event = "estimate_computed",
            instance = %self.instance,
            provider = %provider,
            environment = %environment,
            total_cost = total_cost,
            advisories = advisories,
            rule_set_version = %rule_set_version,
            "Computed cost estimate"
        );
    }

    /// Log a rejected request
    pub fn log_rejected(&self, operation: &str, kind: &str, details: &str) {
        warn!(
            event = "request_rejected",
            instance = %self.instance,
            operation = %operation,
            kind = %kind,
            details = %details,
            "Rejected invalid input"
        );
    }

    /// Log a billing-history report
    pub fn log_billing_report(&self, records: usize, matched: usize, total_spend: f64) {
        info!(
            event = "billing_report",
            instance = %self.instance,
            records = records,
            matched = matched,
            total_spend = total_spend,
            "Analyzed billing history"
        );
    }

    /// Log the rate table in use
    pub fn log_rate_table(&self, source: &str, providers: &[&str]) {
        info!(
            event = "rate_table_loaded",
            instance = %self.instance,
            source = %source,
            providers = ?providers,
            "Rate table loaded"
        );
    }

    pub fn log_startup(&self, version: &str, rule_set_version: &str) {
        info!(
            event = "agent_started",
            instance = %self.instance,
            agent_version = %version,
            rule_set_version = %rule_set_version,
            "Cost agent started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "agent_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Cost agent shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_metrics_creation() {
        let metrics = EngineMetrics::new();

        metrics.observe_estimate_latency(0.0001);
        metrics.inc_estimates();
        metrics.inc_request_errors("estimate", "invalid_range");
        metrics.inc_request_errors("billing_analyze", "billing_data");
        metrics.inc_advisory("cpu_reduction");
        metrics.record_billing_report(12);
        metrics.set_rate_table_providers(3);

        // Second handle shares the same registry entries
        let other = EngineMetrics::new();
        other.inc_estimates();
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("test-instance");
        assert_eq!(logger.instance, "test-instance");
    }
}
