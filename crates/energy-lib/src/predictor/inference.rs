//! Regressor implementations
//!
//! `OnnxRegressor` runs an exported model through tract; `LinearRegressor`
//! evaluates plain coefficients and is handy for small deployments and tests.

use super::{ModelFormat, Regressor};
use crate::error::PredictError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tract_onnx::prelude::*;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// ONNX regressor executed with tract
pub struct OnnxRegressor {
    model: TractModel,
    n_features: usize,
}

impl OnnxRegressor {
    /// Load and optimize an ONNX model taking `[1, n_features]` f32 input
    pub fn from_bytes(model_bytes: &[u8], n_features: usize) -> Result<Self> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, n_features]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;
        Ok(Self { model, n_features })
    }

    fn features_to_tensor(&self, scaled: &[f64]) -> Result<Tensor, PredictError> {
        let data: Vec<f32> = scaled.iter().map(|v| *v as f32).collect();
        tract_ndarray::Array2::from_shape_vec((1, self.n_features), data)
            .map(Tensor::from)
            .map_err(|_| PredictError::ShapeMismatch {
                expected: self.n_features,
                actual: scaled.len(),
            })
    }
}

impl Regressor for OnnxRegressor {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn format(&self) -> ModelFormat {
        ModelFormat::Onnx
    }

    fn predict(&self, scaled: &[f64]) -> Result<f64, PredictError> {
        let input = self.features_to_tensor(scaled)?;

        let result = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| PredictError::Inference(format!("{:#}", e)))?;
        let output = result
            .first()
            .ok_or_else(|| PredictError::Inference("No output from model".to_string()))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| PredictError::Inference(format!("{:#}", e)))?;

        view.iter()
            .next()
            .map(|v| *v as f64)
            .ok_or_else(|| PredictError::Inference("Model produced an empty output".to_string()))
    }
}

/// Linear regressor: `intercept + coefficients · x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegressor {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, String> {
        let model: Self = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        if model.coefficients.is_empty() {
            return Err("regressor has no coefficients".to_string());
        }
        if !model.intercept.is_finite() || model.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("regressor parameters must be finite".to_string());
        }
        Ok(model)
    }
}

impl Regressor for LinearRegressor {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn format(&self) -> ModelFormat {
        ModelFormat::Linear
    }

    fn predict(&self, scaled: &[f64]) -> Result<f64, PredictError> {
        if scaled.len() != self.coefficients.len() {
            return Err(PredictError::ShapeMismatch {
                expected: self.coefficients.len(),
                actual: scaled.len(),
            });
        }
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(scaled)
                .map(|(c, x)| c * x)
                .sum::<f64>())
    }
}
