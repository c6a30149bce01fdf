//! Integration tests for the optimizer API endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use energy_lib::{
    health::{components, HealthRegistry},
    observability::{OptimizerMetrics, StructuredLogger},
    predictor::{ArtifactPaths, ModelGateway},
    Evaluator,
};
use energy_optimizer::api::{create_router, AppState};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const SCALER_JSON: &str = r#"{"mean": [22, 50, 12, 3, 2, 5], "scale": [1, 1, 1, 1, 1, 1]}"#;
const LINEAR_JSON: &str = r#"{"coefficients": [-0.5, 0, 0, 0, 0, 1], "intercept": 5.0}"#;

async fn setup_test_app(dir: &TempDir, with_artifacts: bool) -> (Router, Arc<AppState>) {
    let model_path = dir.path().join("model.json");
    let scaler_path = dir.path().join("scaler.json");
    if with_artifacts {
        fs::write(&model_path, LINEAR_JSON).unwrap();
        fs::write(&scaler_path, SCALER_JSON).unwrap();
    }

    let health_registry = HealthRegistry::new();
    health_registry.register(components::MODEL_GATEWAY).await;

    let metrics = OptimizerMetrics::new();
    let gateway = Arc::new(ModelGateway::new(ArtifactPaths::new(model_path, scaler_path)));
    if gateway.initialize().is_ok() {
        health_registry.set_ready(true).await;
    }
    let evaluator = Arc::new(Evaluator::new(gateway, metrics.clone()));

    let state = Arc::new(AppState::new(
        health_registry,
        metrics,
        evaluator,
        StructuredLogger::new("test-home"),
    ));
    let router = create_router(state.clone());

    (router, state)
}

async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
}

fn reference_reading() -> serde_json::Value {
    serde_json::json!({
        "temperature": 22.0,
        "humidity": 50.0,
        "time_of_day": "12:00",
        "day_of_week": "Monday",
        "occupancy": 2,
        "appliance_usage": 5.0
    })
}

#[tokio::test]
async fn test_evaluate_reference_reading() {
    let dir = TempDir::new().unwrap();
    let (app, _state) = setup_test_app(&dir, true).await;

    let (status, body) = post_json(app, "/api/v1/evaluate", reference_reading()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction_kwh"], 5.0);
    assert_eq!(body["severity"], "moderate");
    assert_eq!(body["headline"], "Moderate Energy Usage");
    assert_eq!(
        body["features"],
        serde_json::json!([22.0, 50.0, 12.0, 0.0, 2.0, 5.0])
    );
    assert!(body["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_evaluate_fires_rules_in_order() {
    let dir = TempDir::new().unwrap();
    let (app, _state) = setup_test_app(&dir, true).await;

    let mut reading = reference_reading();
    reading["temperature"] = serde_json::json!(18.0);
    reading["occupancy"] = serde_json::json!(0);
    reading["appliance_usage"] = serde_json::json!(8.0);

    let (status, body) = post_json(app, "/api/v1/evaluate", reading).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["severity"], "high");
    let rules: Vec<&str> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["rule"].as_str().unwrap())
        .collect();
    assert_eq!(rules, vec!["comfort_band", "spread_usage", "standby_power"]);
}

#[tokio::test]
async fn test_evaluate_rejects_unknown_day() {
    let dir = TempDir::new().unwrap();
    let (app, _state) = setup_test_app(&dir, true).await;

    let mut reading = reference_reading();
    reading["day_of_week"] = serde_json::json!("Caturday");

    let (status, body) = post_json(app, "/api/v1/evaluate", reading).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "invalid_input");
    assert!(body["error"].as_str().unwrap().contains("Caturday"));
}

#[tokio::test]
async fn test_evaluate_rejects_out_of_range_temperature() {
    let dir = TempDir::new().unwrap();
    let (app, _state) = setup_test_app(&dir, true).await;

    let mut reading = reference_reading();
    reading["temperature"] = serde_json::json!(40.0);

    let (status, body) = post_json(app, "/api/v1/evaluate", reading).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("temperature"));
}

#[tokio::test]
async fn test_evaluate_rejects_fractional_occupancy() {
    let dir = TempDir::new().unwrap();
    let (app, _state) = setup_test_app(&dir, true).await;

    let mut reading = reference_reading();
    reading["occupancy"] = serde_json::json!(2.5);

    let (status, body) = post_json(app, "/api/v1/evaluate", reading).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "invalid_input");
    assert!(body["error"].as_str().unwrap().contains("occupancy"));
}

#[tokio::test]
async fn test_evaluate_rejects_missing_field() {
    let dir = TempDir::new().unwrap();
    let (app, _state) = setup_test_app(&dir, true).await;

    let mut reading = reference_reading();
    reading.as_object_mut().unwrap().remove("occupancy");

    let (status, body) = post_json(app, "/api/v1/evaluate", reading).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "invalid_input");
    assert!(body["error"].as_str().unwrap().contains("missing field"));
}

#[tokio::test]
async fn test_evaluate_rejects_string_for_number() {
    let dir = TempDir::new().unwrap();
    let (app, _state) = setup_test_app(&dir, true).await;

    let mut reading = reference_reading();
    reading["temperature"] = serde_json::json!("warm");

    let (status, body) = post_json(app, "/api/v1/evaluate", reading).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "invalid_input");
}

#[tokio::test]
async fn test_evaluate_without_artifacts_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let (app, _state) = setup_test_app(&dir, false).await;

    let (status, body) = post_json(app, "/api/v1/evaluate", reference_reading()).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "model_unavailable");
}

#[tokio::test]
async fn test_usage_pattern_has_24_hours() {
    let dir = TempDir::new().unwrap();
    let (app, _state) = setup_test_app(&dir, true).await;

    let (status, body) = get_json(app, "/api/v1/usage-pattern").await;

    assert_eq!(status, StatusCode::OK);
    let points = body.as_array().unwrap();
    assert_eq!(points.len(), 24);
    assert_eq!(points[23]["hour"], 23);
}

#[tokio::test]
async fn test_model_info() {
    let dir = TempDir::new().unwrap();
    let (app, _state) = setup_test_app(&dir, true).await;

    let (status, body) = get_json(app, "/api/v1/model").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_format"], "linear");
    assert_eq!(body["n_features"], 6);
    assert_eq!(body["feature_names"][3], "day_of_week");
}

#[tokio::test]
async fn test_healthz_ok_with_artifacts() {
    let dir = TempDir::new().unwrap();
    let (app, _state) = setup_test_app(&dir, true).await;

    let (status, body) = get_json(app, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    let components = body["components"].as_object().unwrap();
    assert_eq!(components.len(), 1);
    assert!(components.contains_key("model_gateway"));
}

#[tokio::test]
async fn test_healthz_unavailable_without_artifacts() {
    let dir = TempDir::new().unwrap();
    let (app, _state) = setup_test_app(&dir, false).await;

    let (status, body) = get_json(app, "/healthz").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["components"]["model_gateway"]["status"], "unhealthy");
}

#[tokio::test]
async fn test_readyz_reflects_artifact_load() {
    let dir = TempDir::new().unwrap();
    let (app, _state) = setup_test_app(&dir, true).await;
    let (status, body) = get_json(app, "/readyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);

    let dir = TempDir::new().unwrap();
    let (app, _state) = setup_test_app(&dir, false).await;
    let (status, body) = get_json(app, "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ready"], false);
}

#[tokio::test]
async fn test_metrics_exposes_optimizer_counters() {
    let dir = TempDir::new().unwrap();
    let (app, _state) = setup_test_app(&dir, true).await;

    let (status, _) = post_json(app.clone(), "/api/v1/evaluate", reference_reading()).await;
    assert_eq!(status, StatusCode::OK);

    let mut malformed = reference_reading();
    malformed["occupancy"] = serde_json::json!(2.5);
    let (status, _) = post_json(app.clone(), "/api/v1/evaluate", malformed).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8_lossy(&body);
    assert!(text.contains("energy_optimizer_evaluations_total"));
    assert!(text.contains("energy_optimizer_severity_total"));

    // Counters are process-global, so other tests may have added to them
    let invalid_inputs: f64 = text
        .lines()
        .find_map(|line| line.strip_prefix("energy_optimizer_invalid_inputs_total "))
        .and_then(|value| value.trim().parse().ok())
        .unwrap();
    assert!(invalid_inputs >= 1.0);
}
