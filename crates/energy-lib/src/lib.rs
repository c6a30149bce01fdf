//! Core library for the smart home energy optimizer
//!
//! This crate provides:
//! - Validation and feature encoding of household readings
//! - Lazily-loaded model artifacts and scale-then-predict inference
//! - Severity classification and rule-based recommendations
//! - Health checks and observability

pub mod error;
pub mod evaluator;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod recommendations;
pub mod severity;
pub mod usage_pattern;

pub use error::{ArtifactError, ArtifactKind, EvaluationError, InputError, PredictError};
pub use evaluator::{Evaluation, Evaluator};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{OptimizerMetrics, StructuredLogger};
pub use recommendations::{Recommendation, RecommendationEngine, RuleId, OPTIMIZED_MESSAGE};
pub use severity::SeverityLevel;
