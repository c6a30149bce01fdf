//! Energy Optimizer - household energy prediction service
//!
//! Loads the model artifacts once at startup and serves evaluations,
//! health probes and Prometheus metrics over HTTP.

use anyhow::Result;
use energy_lib::{
    health::{components, HealthRegistry},
    observability::{OptimizerMetrics, StructuredLogger},
    predictor::ModelGateway,
    Evaluator,
};
use energy_optimizer::{api, config};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const OPTIMIZER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting energy-optimizer");

    let config = config::OptimizerConfig::load()?;
    info!(
        instance = %config.instance_name,
        model_path = %config.model_path.display(),
        scaler_path = %config.scaler_path.display(),
        "Optimizer configured"
    );

    let logger = StructuredLogger::new(&config.instance_name);
    logger.log_startup(OPTIMIZER_VERSION);

    let health_registry = HealthRegistry::new();
    health_registry.register(components::MODEL_GATEWAY).await;

    let metrics = OptimizerMetrics::new();

    // Artifacts are loaded eagerly: a missing or corrupt artifact stops the
    // process here instead of failing every request.
    let gateway = Arc::new(ModelGateway::new(config.artifact_paths()));
    let artifacts = match gateway.initialize() {
        Ok(artifacts) => artifacts,
        Err(e) => {
            logger.log_artifacts_failed(&e.to_string());
            return Err(e.into());
        }
    };
    logger.log_artifacts_loaded(artifacts.info());
    metrics.set_model_info(
        artifacts.info().model_format.as_str(),
        &artifacts.info().model_sha256,
    );

    let evaluator = Arc::new(Evaluator::new(gateway.clone(), metrics.clone()));
    let app_state = Arc::new(api::AppState::new(
        health_registry.clone(),
        metrics,
        evaluator,
        logger.clone(),
    ));

    health_registry.set_ready(true).await;

    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    tokio::select! {
        result = api_handle => {
            result??;
        }
        _ = tokio::signal::ctrl_c() => {
            logger.log_shutdown("SIGINT received");
        }
    }

    info!("Shutting down");
    Ok(())
}
