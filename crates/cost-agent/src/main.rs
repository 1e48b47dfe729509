//! Cost Agent - HTTP service for cost estimates and optimization advice
//!
//! Loads a rate table once at startup and serves estimates, billing-history
//! analysis, health and metrics over HTTP.

use anyhow::Result;
use cost_agent::{api, config::AgentConfig};
use cost_engine::{
    health::{components, HealthRegistry},
    observability::{EngineMetrics, StructuredLogger},
    CostEngine,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const AGENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting cost-agent");

    let config = AgentConfig::load()?;
    info!(
        instance = %config.instance_name,
        port = config.api_port,
        storage_policy = %config.storage_policy,
        "Agent configured"
    );

    let health_registry = HealthRegistry::new();
    let metrics = EngineMetrics::new();
    let logger = StructuredLogger::new(&config.instance_name);

    let (rates, source) = config.load_rates()?;
    let providers: Vec<&str> = rates.providers().collect();
    logger.log_rate_table(&source.to_string(), &providers);
    metrics.set_rate_table_providers(rates.len() as i64);
    health_registry
        .update(components::RATE_TABLE, source.health())
        .await;

    let engine = CostEngine::new(rates, config.storage_policy);
    logger.log_startup(AGENT_VERSION, &engine.rules().version());

    let app_state = Arc::new(api::AppState::new(
        engine,
        health_registry.clone(),
        metrics,
        logger.clone(),
    ));

    health_registry.set_ready(true).await;

    let server = tokio::spawn(api::serve(config.api_port, app_state));

    tokio::select! {
        result = server => {
            match result {
                Ok(Ok(())) => info!("API server exited"),
                Ok(Err(err)) => {
                    error!(error = %err, "API server failed");
                    return Err(err);
                }
                Err(err) => return Err(err.into()),
            }
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            logger.log_shutdown("SIGINT received");
        }
    }

    info!("Shutting down");
    Ok(())
}
