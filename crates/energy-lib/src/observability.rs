//! Observability infrastructure for the energy optimizer
//!
//! Provides:
//! - Prometheus metrics (evaluation latency, outcomes by severity and rule, model info)
//! - Structured JSON logging with tracing

use crate::evaluator::Evaluation;
use crate::predictor::ArtifactInfo;
use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_counter_vec,
    GaugeVec, Histogram, IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{error, info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<OptimizerMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct OptimizerMetricsInner {
    evaluation_latency_seconds: Histogram,
    evaluations: IntCounter,
    evaluation_errors: IntCounter,
    invalid_inputs: IntCounter,
    severity: IntCounterVec,
    recommendations: IntCounterVec,
    model_info: GaugeVec,
}

impl OptimizerMetricsInner {
    fn new() -> Self {
        Self {
            evaluation_latency_seconds: register_histogram!(
                "energy_optimizer_evaluation_latency_seconds",
                "Time spent encoding, predicting, classifying and recommending",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register evaluation_latency_seconds"),

            evaluations: register_int_counter!(
                "energy_optimizer_evaluations_total",
                "Total number of successful evaluations"
            )
            .expect("Failed to register evaluations_total"),

            evaluation_errors: register_int_counter!(
                "energy_optimizer_evaluation_errors_total",
                "Total number of evaluations that failed during prediction"
            )
            .expect("Failed to register evaluation_errors_total"),

            invalid_inputs: register_int_counter!(
                "energy_optimizer_invalid_inputs_total",
                "Total number of requests rejected before encoding"
            )
            .expect("Failed to register invalid_inputs_total"),

            severity: register_int_counter_vec!(
                "energy_optimizer_severity_total",
                "Evaluations by severity level",
                &["level"]
            )
            .expect("Failed to register severity_total"),

            recommendations: register_int_counter_vec!(
                "energy_optimizer_recommendations_total",
                "Recommendations emitted by rule",
                &["rule"]
            )
            .expect("Failed to register recommendations_total"),

            model_info: register_gauge_vec!(
                "energy_optimizer_model_info",
                "Information about the loaded model artifacts",
                &["format", "model_sha256"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Optimizer metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct OptimizerMetrics {
    _private: (),
}

impl Default for OptimizerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl OptimizerMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(OptimizerMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &OptimizerMetricsInner {
        GLOBAL_METRICS.get_or_init(OptimizerMetricsInner::new)
    }

    pub fn observe_evaluation_latency(&self, duration_secs: f64) {
        self.inner().evaluation_latency_seconds.observe(duration_secs);
    }

    /// Count a successful evaluation and its outcome
    pub fn record_evaluation(&self, evaluation: &Evaluation) {
        let inner = self.inner();
        inner.evaluations.inc();
        inner
            .severity
            .with_label_values(&[evaluation.severity.as_str()])
            .inc();
        for rec in &evaluation.recommendations {
            inner.recommendations.with_label_values(&[rec.rule.as_str()]).inc();
        }
    }

    pub fn inc_evaluation_errors(&self) {
        self.inner().evaluation_errors.inc();
    }

    pub fn inc_invalid_inputs(&self) {
        self.inner().invalid_inputs.inc();
    }

    /// Publish the loaded model identity
    pub fn set_model_info(&self, format: &str, model_sha256: &str) {
        self.inner().model_info.reset();
        self.inner()
            .model_info
            .with_label_values(&[format, model_sha256])
            .set(1.0);
    }
}

/// Structured logger for optimizer events
///
/// Provides consistent JSON-formatted logging for startup, artifact
/// loading, evaluations and shutdown.
#[derive(Clone)]
pub struct StructuredLogger {
    instance_name: String,
}

impl StructuredLogger {
    pub fn new(instance_name: impl Into<String>) -> Self {
        Self {
            instance_name: instance_name.into(),
        }
    }

    pub fn log_startup(&self, version: &str) {
        info!(
            event = "optimizer_started",
            instance = %self.instance_name,
            version = %version,
            "Energy optimizer started"
        );
    }

    pub fn log_artifacts_loaded(&self, info: &ArtifactInfo) {
        info!(
            event = "artifacts_loaded",
            instance = %self.instance_name,
            model_path = %info.model_path.display(),
            scaler_path = %info.scaler_path.display(),
            model_format = info.model_format.as_str(),
            model_sha256 = %info.model_sha256,
            scaler_sha256 = %info.scaler_sha256,
            n_features = info.n_features,
            "Model artifacts ready"
        );
    }

    pub fn log_artifacts_failed(&self, reason: &str) {
        error!(
            event = "artifacts_failed",
            instance = %self.instance_name,
            reason = %reason,
            "Model artifacts could not be loaded, refusing to serve"
        );
    }

    pub fn log_evaluation(&self, evaluation: &Evaluation) {
        let rules: Vec<&str> = evaluation
            .recommendations
            .iter()
            .map(|r| r.rule.as_str())
            .collect();
        info!(
            event = "evaluation_completed",
            instance = %self.instance_name,
            prediction_kwh = evaluation.prediction_kwh,
            severity = evaluation.severity.as_str(),
            recommendations = ?rules,
            "Evaluation completed"
        );
    }

    pub fn log_rejected(&self, reason: &str) {
        warn!(
            event = "evaluation_rejected",
            instance = %self.instance_name,
            reason = %reason,
            "Evaluation request rejected"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "optimizer_shutdown",
            instance = %self.instance_name,
            reason = %reason,
            "Energy optimizer shutting down"
        );
    }
}
