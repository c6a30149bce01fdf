//! Model artifact loading
//!
//! Both artifacts are read from disk once, optionally verified against a
//! SHA256 digest, parsed, and cross-checked for width before the gateway
//! will serve predictions with them.

use super::inference::{LinearRegressor, OnnxRegressor};
use super::scaler::StandardScaler;
use super::{ModelFormat, Regressor, Scaler, FEATURE_NAMES};
use crate::error::{ArtifactError, ArtifactKind};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Something that can produce the model artifacts
pub trait ArtifactSource: Send + Sync {
    fn load(&self) -> Result<ModelArtifacts, ArtifactError>;
}

/// Metadata about the loaded artifacts
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactInfo {
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    pub model_format: ModelFormat,
    pub model_sha256: String,
    pub scaler_sha256: String,
    pub n_features: usize,
    pub feature_names: Vec<String>,
}

/// The regressor and its fitted scaler, loaded together
pub struct ModelArtifacts {
    regressor: Box<dyn Regressor>,
    scaler: Box<dyn Scaler>,
    info: ArtifactInfo,
}

impl ModelArtifacts {
    /// Pair a regressor with its scaler; their widths must agree
    pub fn new(
        regressor: Box<dyn Regressor>,
        scaler: Box<dyn Scaler>,
        info: ArtifactInfo,
    ) -> Result<Self, ArtifactError> {
        if regressor.n_features() != scaler.n_features() {
            return Err(ArtifactError::Incompatible {
                regressor: regressor.n_features(),
                scaler: scaler.n_features(),
            });
        }
        Ok(Self {
            regressor,
            scaler,
            info,
        })
    }

    pub fn regressor(&self) -> &dyn Regressor {
        self.regressor.as_ref()
    }

    pub fn scaler(&self) -> &dyn Scaler {
        self.scaler.as_ref()
    }

    pub fn info(&self) -> &ArtifactInfo {
        &self.info
    }
}

/// File locations of the two artifacts, with optional expected digests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    #[serde(default)]
    pub model_sha256: Option<String>,
    #[serde(default)]
    pub scaler_sha256: Option<String>,
}

impl ArtifactPaths {
    pub fn new(model_path: impl Into<PathBuf>, scaler_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            scaler_path: scaler_path.into(),
            model_sha256: None,
            scaler_sha256: None,
        }
    }

    pub fn with_checksums(
        mut self,
        model_sha256: Option<String>,
        scaler_sha256: Option<String>,
    ) -> Self {
        self.model_sha256 = model_sha256;
        self.scaler_sha256 = scaler_sha256;
        self
    }
}

impl ArtifactSource for ArtifactPaths {
    fn load(&self) -> Result<ModelArtifacts, ArtifactError> {
        info!(
            model_path = %self.model_path.display(),
            scaler_path = %self.scaler_path.display(),
            "Loading model artifacts"
        );

        let (scaler_bytes, scaler_sha256) = read_artifact(
            ArtifactKind::Scaler,
            &self.scaler_path,
            self.scaler_sha256.as_deref(),
        )?;
        let scaler = load_scaler(&self.scaler_path, &scaler_bytes)?;

        let (model_bytes, model_sha256) = read_artifact(
            ArtifactKind::Model,
            &self.model_path,
            self.model_sha256.as_deref(),
        )?;
        let regressor = load_regressor(&self.model_path, &model_bytes, scaler.n_features())?;

        let info = ArtifactInfo {
            model_path: self.model_path.clone(),
            scaler_path: self.scaler_path.clone(),
            model_format: regressor.format(),
            model_sha256,
            scaler_sha256,
            n_features: scaler.n_features(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        };

        ModelArtifacts::new(regressor, Box::new(scaler), info)
    }
}

/// Read an artifact and verify its digest when one is expected
fn read_artifact(
    kind: ArtifactKind,
    path: &Path,
    expected_sha256: Option<&str>,
) -> Result<(Vec<u8>, String), ArtifactError> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ArtifactError::NotFound {
            kind,
            path: path.to_path_buf(),
        },
        _ => ArtifactError::Unreadable {
            kind,
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    let actual = compute_checksum(&bytes);
    if let Some(expected) = expected_sha256 {
        if !expected.trim().eq_ignore_ascii_case(&actual) {
            return Err(ArtifactError::ChecksumMismatch {
                kind,
                path: path.to_path_buf(),
                expected: expected.trim().to_string(),
                actual,
            });
        }
    }

    debug!(%kind, size_bytes = bytes.len(), sha256 = %actual, "Artifact read");
    Ok((bytes, actual))
}

fn load_scaler(path: &Path, bytes: &[u8]) -> Result<StandardScaler, ArtifactError> {
    if !has_extension(path, "json") {
        return Err(ArtifactError::UnsupportedFormat {
            kind: ArtifactKind::Scaler,
            path: path.to_path_buf(),
        });
    }
    StandardScaler::from_json(bytes).map_err(|reason| ArtifactError::Malformed {
        kind: ArtifactKind::Scaler,
        path: path.to_path_buf(),
        reason,
    })
}

fn load_regressor(
    path: &Path,
    bytes: &[u8],
    n_features: usize,
) -> Result<Box<dyn Regressor>, ArtifactError> {
    let malformed = |reason: String| ArtifactError::Malformed {
        kind: ArtifactKind::Model,
        path: path.to_path_buf(),
        reason,
    };

    if has_extension(path, "onnx") {
        let model = OnnxRegressor::from_bytes(bytes, n_features)
            .map_err(|e| malformed(format!("{:#}", e)))?;
        Ok(Box::new(model))
    } else if has_extension(path, "json") {
        let model = LinearRegressor::from_json(bytes).map_err(malformed)?;
        Ok(Box::new(model))
    } else {
        Err(ArtifactError::UnsupportedFormat {
            kind: ArtifactKind::Model,
            path: path.to_path_buf(),
        })
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// Hex-encoded SHA256 of an artifact's bytes
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
