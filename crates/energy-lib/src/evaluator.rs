//! End-to-end evaluation of a household reading
//!
//! encode → predict → classify → recommend, synchronously and in memory.

use crate::error::{EvaluationError, PredictError};
use crate::models::{FeatureVector, RawInputs, RawInputsRequest};
use crate::observability::OptimizerMetrics;
use crate::predictor::{FeatureEncoder, ModelGateway};
use crate::recommendations::{Recommendation, RecommendationEngine};
use crate::severity::SeverityLevel;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Outcome of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub features: FeatureVector,
    pub prediction_kwh: f64,
    pub severity: SeverityLevel,
    pub headline: &'static str,
    pub advice: &'static str,
    pub recommendations: Vec<Recommendation>,
}

impl Evaluation {
    /// True when no recommendation rule fired
    pub fn is_optimal(&self) -> bool {
        self.recommendations.is_empty()
    }
}

/// Runs the full pipeline against a shared model gateway
pub struct Evaluator {
    gateway: Arc<ModelGateway>,
    encoder: FeatureEncoder,
    engine: RecommendationEngine,
    metrics: OptimizerMetrics,
}

impl Evaluator {
    pub fn new(gateway: Arc<ModelGateway>, metrics: OptimizerMetrics) -> Self {
        Self::with_engine(gateway, RecommendationEngine::new(), metrics)
    }

    pub fn with_engine(
        gateway: Arc<ModelGateway>,
        engine: RecommendationEngine,
        metrics: OptimizerMetrics,
    ) -> Self {
        Self {
            gateway,
            encoder: FeatureEncoder::new(),
            engine,
            metrics,
        }
    }

    pub fn gateway(&self) -> &ModelGateway {
        &self.gateway
    }

    /// Evaluate an already-validated reading
    pub fn evaluate(&self, inputs: &RawInputs) -> Result<Evaluation, PredictError> {
        let start = Instant::now();

        let features = self.encoder.encode(inputs);
        let prediction_kwh = match self.gateway.predict(&features) {
            Ok(p) => p,
            Err(e) => {
                self.metrics.inc_evaluation_errors();
                return Err(e);
            }
        };
        let severity = SeverityLevel::classify(prediction_kwh);
        let recommendations = self.engine.recommend(inputs);

        let evaluation = Evaluation {
            features,
            prediction_kwh,
            severity,
            headline: severity.headline(),
            advice: severity.advice(),
            recommendations,
        };

        self.metrics
            .observe_evaluation_latency(start.elapsed().as_secs_f64());
        self.metrics.record_evaluation(&evaluation);
        debug!(
            prediction_kwh,
            severity = severity.as_str(),
            recommendations = evaluation.recommendations.len(),
            "Evaluated reading"
        );

        Ok(evaluation)
    }

    /// Validate a loosely-typed request, then evaluate it
    pub fn evaluate_request(
        &self,
        request: &RawInputsRequest,
    ) -> Result<Evaluation, EvaluationError> {
        let inputs = RawInputs::try_from(request).map_err(|e| {
            self.metrics.inc_invalid_inputs();
            e
        })?;
        Ok(self.evaluate(&inputs)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ArtifactError, InputError};
    use crate::predictor::ArtifactPaths;
    use crate::recommendations::RuleId;
    use std::fs;
    use tempfile::TempDir;

    // Unit scale, so the linear model sees raw deviations from the mean.
    const SCALER_JSON: &str = r#"{"mean": [22, 50, 12, 3, 2, 5], "scale": [1, 1, 1, 1, 1, 1]}"#;
    const LINEAR_JSON: &str = r#"{"coefficients": [-0.5, 0, 0, 0, 0, 1], "intercept": 5.0}"#;

    fn evaluator(dir: &TempDir) -> Evaluator {
        let model_path = dir.path().join("model.json");
        let scaler_path = dir.path().join("scaler.json");
        fs::write(&model_path, LINEAR_JSON).unwrap();
        fs::write(&scaler_path, SCALER_JSON).unwrap();
        let gateway = ModelGateway::new(ArtifactPaths::new(model_path, scaler_path));
        Evaluator::new(Arc::new(gateway), OptimizerMetrics::new())
    }

    #[test]
    fn test_reference_reading() {
        let dir = TempDir::new().unwrap();
        let evaluation = evaluator(&dir)
            .evaluate_request(&RawInputsRequest::default())
            .unwrap();

        assert_eq!(evaluation.features.values(), &[22.0, 50.0, 12.0, 0.0, 2.0, 5.0]);
        assert_eq!(evaluation.prediction_kwh, 5.0);
        assert_eq!(evaluation.severity, SeverityLevel::Moderate);
        assert_eq!(evaluation.headline, "Moderate Energy Usage");
        assert!(evaluation.is_optimal());
    }

    #[test]
    fn test_high_usage_reading() {
        let dir = TempDir::new().unwrap();
        let request = RawInputsRequest {
            temperature: 18.0,
            occupancy: 0,
            appliance_usage: 8.0,
            ..Default::default()
        };
        let evaluation = evaluator(&dir).evaluate_request(&request).unwrap();

        // 5 + (-0.5 * -4) + (1 * 3)
        assert_eq!(evaluation.prediction_kwh, 10.0);
        assert_eq!(evaluation.severity, SeverityLevel::High);
        let rules: Vec<_> = evaluation.recommendations.iter().map(|r| r.rule).collect();
        assert_eq!(
            rules,
            vec![RuleId::ComfortBand, RuleId::SpreadUsage, RuleId::StandbyPower]
        );
    }

    #[test]
    fn test_invalid_request_never_reaches_model() {
        let dir = TempDir::new().unwrap();
        let evaluator = evaluator(&dir);
        let request = RawInputsRequest {
            humidity: 95.0,
            ..Default::default()
        };

        assert!(matches!(
            evaluator.evaluate_request(&request),
            Err(EvaluationError::Input(InputError::OutOfRange { field: "humidity", .. }))
        ));
        assert!(!evaluator.gateway().is_initialized());
    }

    #[test]
    fn test_missing_artifacts_surface_as_unavailable() {
        let dir = TempDir::new().unwrap();
        let gateway = ModelGateway::new(ArtifactPaths::new(
            dir.path().join("energy_optimizer_model.onnx"),
            dir.path().join("scaler.json"),
        ));
        assert!(matches!(
            gateway.initialize(),
            Err(ArtifactError::NotFound { .. })
        ));

        let evaluator = Evaluator::new(Arc::new(gateway), OptimizerMetrics::new());
        assert!(matches!(
            evaluator.evaluate_request(&RawInputsRequest::default()),
            Err(EvaluationError::Predict(PredictError::Unavailable(_)))
        ));
    }

    #[test]
    fn test_evaluation_serializes() {
        let dir = TempDir::new().unwrap();
        let evaluation = evaluator(&dir)
            .evaluate_request(&RawInputsRequest::default())
            .unwrap();
        let json = serde_json::to_value(&evaluation).unwrap();

        assert_eq!(json["severity"], "moderate");
        assert_eq!(json["features"][3], 0.0);
        assert!(json["recommendations"].as_array().unwrap().is_empty());
    }
}
