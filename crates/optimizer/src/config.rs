//! Optimizer configuration

use anyhow::{Context, Result};
use energy_lib::predictor::ArtifactPaths;
use serde::Deserialize;
use std::path::PathBuf;

/// Optimizer service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizerConfig {
    /// Name reported in structured logs
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// API server port for evaluation/health/metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Regressor artifact (`.onnx` or linear `.json`)
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Fitted scaler artifact (`.json`)
    #[serde(default = "default_scaler_path")]
    pub scaler_path: PathBuf,

    /// Expected SHA256 of the model artifact
    #[serde(default)]
    pub model_sha256: Option<String>,

    /// Expected SHA256 of the scaler artifact
    #[serde(default)]
    pub scaler_sha256: Option<String>,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "local".to_string())
}

fn default_api_port() -> u16 {
    8080
}

fn default_model_path() -> PathBuf {
    PathBuf::from("energy_optimizer_model.onnx")
}

fn default_scaler_path() -> PathBuf {
    PathBuf::from("scaler.json")
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            instance_name: default_instance_name(),
            api_port: default_api_port(),
            model_path: default_model_path(),
            scaler_path: default_scaler_path(),
            model_sha256: None,
            scaler_sha256: None,
        }
    }
}

impl OptimizerConfig {
    /// Load configuration from `optimizer.toml` (optional) and `OPTIMIZER_*` env vars
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("optimizer").required(false))
            .add_source(config::Environment::with_prefix("OPTIMIZER"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Invalid optimizer configuration")
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(&self.model_path, &self.scaler_path)
            .with_checksums(self.model_sha256.clone(), self.scaler_sha256.clone())
    }
}
