//! Error types for the optimizer core
//!
//! Three families with different blast radius:
//! - [`ArtifactError`]: model or scaler could not be loaded. Fatal at startup.
//! - [`InputError`]: a request field is outside its documented domain.
//! - [`PredictError`]: a single prediction failed. Shared state is untouched.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which of the two artifacts an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Model,
    Scaler,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Model => f.write_str("model"),
            ArtifactKind::Scaler => f.write_str("scaler"),
        }
    }
}

/// Failure to load the model artifacts
#[derive(Debug, Clone, Error)]
pub enum ArtifactError {
    #[error("{kind} artifact not found at {}", path.display())]
    NotFound { kind: ArtifactKind, path: PathBuf },

    #[error("failed to read {kind} artifact at {}: {reason}", path.display())]
    Unreadable {
        kind: ArtifactKind,
        path: PathBuf,
        reason: String,
    },

    #[error("unsupported {kind} artifact format at {}", path.display())]
    UnsupportedFormat { kind: ArtifactKind, path: PathBuf },

    #[error("malformed {kind} artifact at {}: {reason}", path.display())]
    Malformed {
        kind: ArtifactKind,
        path: PathBuf,
        reason: String,
    },

    #[error("checksum mismatch for {kind} artifact at {}: expected {expected}, got {actual}", path.display())]
    ChecksumMismatch {
        kind: ArtifactKind,
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("regressor expects {regressor} features but scaler was fitted on {scaler}")]
    Incompatible { regressor: usize, scaler: usize },
}

/// A request field outside its documented domain
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("unknown day of week '{0}', expected one of Monday..Sunday")]
    UnknownDay(String),

    #[error("invalid time of day '{0}', expected HH:MM")]
    InvalidTime(String),
}

/// Per-request prediction failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("feature vector has {actual} values, scaler expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("model artifacts unavailable: {0}")]
    Unavailable(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Anything that can stop a single evaluation
#[derive(Debug, Clone, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Predict(#[from] PredictError),
}
