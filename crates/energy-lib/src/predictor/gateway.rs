//! Shared, lazily-initialized access to the model artifacts
//!
//! The gateway loads its artifacts at most once per process. Concurrent
//! first callers block on the same load; the outcome (success or failure) is
//! memoized and never retried. After that the artifacts are read without any
//! locking.

use super::artifacts::{ArtifactSource, ModelArtifacts};
use crate::error::{ArtifactError, PredictError};
use crate::models::FeatureVector;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Maximum inference latency before warning
const MAX_INFERENCE_MS: u128 = 5;

/// Owner of the regressor and scaler
pub struct ModelGateway {
    source: Box<dyn ArtifactSource>,
    artifacts: OnceLock<Result<ModelArtifacts, ArtifactError>>,
    inference_count: AtomicU64,
    failed_inference_count: AtomicU64,
    slow_inference_count: AtomicU64,
}

impl ModelGateway {
    /// Create a gateway that loads from `source` on first use
    pub fn new(source: impl ArtifactSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            artifacts: OnceLock::new(),
            inference_count: AtomicU64::new(0),
            failed_inference_count: AtomicU64::new(0),
            slow_inference_count: AtomicU64::new(0),
        }
    }

    /// Load the artifacts if this is the first call, then return them
    pub fn initialize(&self) -> Result<&ModelArtifacts, ArtifactError> {
        self.artifacts
            .get_or_init(|| {
                let start = Instant::now();
                let loaded = self.source.load();
                match &loaded {
                    Ok(artifacts) => info!(
                        model_format = artifacts.info().model_format.as_str(),
                        n_features = artifacts.info().n_features,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Model artifacts loaded"
                    ),
                    Err(e) => error!(error = %e, "Failed to load model artifacts"),
                }
                loaded
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Whether a successful load has already happened
    pub fn is_initialized(&self) -> bool {
        matches!(self.artifacts.get(), Some(Ok(_)))
    }

    /// Scale `features` and run the regressor on them
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, PredictError> {
        let artifacts = self
            .initialize()
            .map_err(|e| PredictError::Unavailable(e.to_string()))?;

        let start = Instant::now();
        let result = Self::run(artifacts, features);
        let elapsed = start.elapsed();

        self.inference_count.fetch_add(1, Ordering::Relaxed);
        if let Err(e) = &result {
            self.failed_inference_count.fetch_add(1, Ordering::Relaxed);
            warn!(error = %e, "Prediction failed");
        } else if elapsed.as_millis() > MAX_INFERENCE_MS {
            self.slow_inference_count.fetch_add(1, Ordering::Relaxed);
            warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                "Inference exceeded {}ms target",
                MAX_INFERENCE_MS
            );
        } else {
            debug!(elapsed_us = elapsed.as_micros() as u64, "Inference completed");
        }

        result
    }

    fn run(artifacts: &ModelArtifacts, features: &FeatureVector) -> Result<f64, PredictError> {
        let expected = artifacts.scaler().n_features();
        if features.len() != expected {
            return Err(PredictError::ShapeMismatch {
                expected,
                actual: features.len(),
            });
        }

        let scaled = artifacts.scaler().transform(features.values())?;
        let prediction = artifacts.regressor().predict(&scaled)?;
        if !prediction.is_finite() {
            return Err(PredictError::Inference(format!(
                "model produced a non-finite prediction ({})",
                prediction
            )));
        }
        Ok(prediction)
    }

    /// Get inference statistics
    pub fn stats(&self) -> InferenceStats {
        InferenceStats {
            total_inferences: self.inference_count.load(Ordering::Relaxed),
            failed_inferences: self.failed_inference_count.load(Ordering::Relaxed),
            slow_inferences: self.slow_inference_count.load(Ordering::Relaxed),
        }
    }
}

/// Inference statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceStats {
    pub total_inferences: u64,
    pub failed_inferences: u64,
    pub slow_inferences: u64,
}
