//! HTTP API for evaluations, health checks and Prometheus metrics

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use energy_lib::{
    health::{ComponentStatus, HealthRegistry},
    observability::{OptimizerMetrics, StructuredLogger},
    usage_pattern::{self, HourlyUsage},
    EvaluationError, Evaluator, PredictError, RawInputsRequest,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub health_registry: HealthRegistry,
    pub metrics: OptimizerMetrics,
    pub evaluator: Arc<Evaluator>,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        health_registry: HealthRegistry,
        metrics: OptimizerMetrics,
        evaluator: Arc<Evaluator>,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            health_registry,
            metrics,
            evaluator,
            logger,
        }
    }
}

/// Error body returned by the API
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

fn error_response(status: StatusCode, code: &'static str, error: String) -> Response {
    (status, Json(ErrorResponse { error, code })).into_response()
}

/// Evaluate a household reading
async fn evaluate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawInputsRequest>, JsonRejection>,
) -> Response {
    // Malformed bodies are reported like any other invalid input
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let reason = rejection.body_text();
            state.metrics.inc_invalid_inputs();
            state.logger.log_rejected(&reason);
            return error_response(StatusCode::UNPROCESSABLE_ENTITY, "invalid_input", reason);
        }
    };

    match state.evaluator.evaluate_request(&request) {
        Ok(evaluation) => {
            state.logger.log_evaluation(&evaluation);
            (StatusCode::OK, Json(evaluation)).into_response()
        }
        Err(EvaluationError::Input(e)) => {
            state.logger.log_rejected(&e.to_string());
            error_response(StatusCode::UNPROCESSABLE_ENTITY, "invalid_input", e.to_string())
        }
        Err(EvaluationError::Predict(e)) => {
            let (status, code) = match &e {
                PredictError::Unavailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "model_unavailable")
                }
                PredictError::ShapeMismatch { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "shape_mismatch")
                }
                PredictError::Inference(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "inference_failed")
                }
            };
            error!(error = %e, "Evaluation failed");
            error_response(status, code, e.to_string())
        }
    }
}

fn simulated_pattern() -> anyhow::Result<Vec<HourlyUsage>> {
    usage_pattern::simulate(&mut rand::thread_rng())
}

/// Simulated 24-hour usage curve, for display only
async fn usage_pattern_handler() -> Response {
    match simulated_pattern() {
        Ok(pattern) => (StatusCode::OK, Json(pattern)).into_response(),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "simulation_failed",
            e.to_string(),
        ),
    }
}

/// Metadata of the loaded model artifacts
async fn model_info(State(state): State<Arc<AppState>>) -> Response {
    match state.evaluator.gateway().initialize() {
        Ok(artifacts) => (StatusCode::OK, Json(artifacts.info().clone())).into_response(),
        Err(e) => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "model_unavailable",
            e.to_string(),
        ),
    }
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state
        .health_registry
        .observe_gateway(state.evaluator.gateway())
        .await;
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Still operational
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
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

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "metrics_failed", e.to_string());
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
        .route("/api/v1/evaluate", post(evaluate))
        .route("/api/v1/usage-pattern", get(usage_pattern_handler))
        .route("/api/v1/model", get(model_info))
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
