//! HTTP API for estimates, billing analysis, health checks and Prometheus metrics

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use cost_engine::{
    billing::{self, BillingFilter, BillingRecord, BillingReport, FilterChoices},
    health::HealthRegistry,
    observability::{EngineMetrics, StructuredLogger},
    CostEngine, EngineError, EstimateReport, StoragePolicy, UsageConfig,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: CostEngine,
    pub health_registry: HealthRegistry,
    pub metrics: EngineMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        engine: CostEngine,
        health_registry: HealthRegistry,
        metrics: EngineMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            engine,
            health_registry,
            metrics,
            logger,
        }
    }
}

/// Error returned by API handlers as `{"error": ..., "kind": ...}`
#[derive(Debug)]
pub enum ApiError {
    Engine(EngineError),
    BadRequest(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::Engine(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Engine(err) => err.kind(),
            ApiError::BadRequest(_) => "invalid_request",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Engine(err) => err.to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message(),
            "kind": self.kind(),
        }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

/// Estimate request: a usage configuration plus an optional storage policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateRequest {
    #[serde(flatten)]
    pub config: UsageConfig,
    #[serde(default)]
    pub storage_policy: Option<StoragePolicy>,
}

/// Billing analysis request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingRequest {
    pub records: Vec<BillingRecord>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
}

/// Billing analysis response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingResponse {
    #[serde(flatten)]
    pub report: BillingReport,
    #[serde(flatten)]
    pub choices: FilterChoices,
}

async fn estimate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> Result<Json<EstimateReport>, ApiError> {
    let result = payload.map_err(ApiError::from).and_then(|Json(request)| {
        let started = Instant::now();
        let report = match request.storage_policy {
            Some(policy) if policy != state.engine.rules().storage_policy() => state
                .engine
                .with_storage_policy(policy)
                .evaluate(&request.config),
            _ => state.engine.evaluate(&request.config),
        }?;
        state
            .metrics
            .observe_estimate_latency(started.elapsed().as_secs_f64());
        Ok((request.config, report))
    });

    match result {
        Ok((config, report)) => {
            state.metrics.inc_estimates();
            for advisory in &report.advisories {
                state.metrics.inc_advisory(advisory.rule.as_str());
            }
            state.logger.log_estimate(
                &config.provider_id,
                config.environment.as_str(),
                report.breakdown.total_cost,
                report.advisories.len(),
                &report.rule_set_version,
            );
            Ok(Json(report))
        }
        Err(err) => {
            state.metrics.inc_request_errors("estimate", err.kind());
            state
                .logger
                .log_rejected("estimate", err.kind(), &err.message());
            Err(err)
        }
    }
}

async fn analyze_billing(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BillingRequest>, JsonRejection>,
) -> Result<Json<BillingResponse>, ApiError> {
    let result = payload.map_err(ApiError::from).and_then(|Json(request)| {
        billing::validate_records(&request.records)?;
        Ok(request)
    });

    let request = match result {
        Ok(request) => request,
        Err(err) => {
            state
                .metrics
                .inc_request_errors("billing_analyze", err.kind());
            state
                .logger
                .log_rejected("billing_analyze", err.kind(), &err.message());
            return Err(err);
        }
    };

    let filter = BillingFilter::new(request.project, request.provider);
    let report = billing::analyze(&request.records, &filter);
    let choices = FilterChoices::from_records(&request.records);

    state
        .metrics
        .record_billing_report(report.summary.record_count);
    state.logger.log_billing_report(
        request.records.len(),
        report.summary.record_count,
        report.summary.total_spend,
    );

    Ok(Json(BillingResponse { report, choices }))
}

async fn rates(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.engine.rates().clone())
}

/// Health check response - degraded components still serve, so always 200
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.health_registry.health().await)
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/estimate", post(estimate))
        .route("/api/v1/billing/analyze", post(analyze_billing))
        .route("/api/v1/rates", get(rates))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
