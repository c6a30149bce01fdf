//! ML prediction engine

mod artifacts;
mod features;
mod gateway;
mod inference;
mod scaler;

pub use artifacts::{
    compute_checksum, ArtifactInfo, ArtifactPaths, ArtifactSource, ModelArtifacts,
};
pub use features::{FeatureEncoder, FEATURE_NAMES, NUM_FEATURES};
pub use gateway::{InferenceStats, ModelGateway};
pub use inference::{LinearRegressor, OnnxRegressor};
pub use scaler::StandardScaler;

use crate::error::PredictError;
use serde::Serialize;

/// Fitted affine transform applied before the regressor
pub trait Scaler: Send + Sync {
    /// Width the scaler was fitted on
    fn n_features(&self) -> usize;

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, PredictError>;
}

/// Trained model mapping a scaled vector to a single estimate
pub trait Regressor: Send + Sync {
    fn n_features(&self) -> usize;

    fn format(&self) -> ModelFormat;

    fn predict(&self, scaled: &[f64]) -> Result<f64, PredictError>;
}

/// On-disk format of the regressor artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    Onnx,
    Linear,
}

impl ModelFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFormat::Onnx => "onnx",
            ModelFormat::Linear => "linear",
        }
    }
}
