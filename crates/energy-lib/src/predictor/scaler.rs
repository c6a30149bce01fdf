//! Fitted input standardization

use super::{Scaler, FEATURE_NAMES};
use crate::error::PredictError;
use serde::{Deserialize, Serialize};

/// Parameters of a fitted standard scaler (`(x - mean) / scale`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, String> {
        let scaler = Self {
            mean,
            scale,
            feature_names: None,
        };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Parse fitted parameters from JSON and check they are usable
    pub fn from_json(bytes: &[u8]) -> Result<Self, String> {
        let scaler: Self = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<(), String> {
        if self.mean.is_empty() {
            return Err("scaler has no fitted columns".to_string());
        }
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self
            .mean
            .iter()
            .chain(self.scale.iter())
            .any(|v| !v.is_finite())
        {
            return Err("scaler parameters must be finite".to_string());
        }
        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(format!(
                    "scaler was fitted on columns {:?}, expected {:?}",
                    names, FEATURE_NAMES
                ));
            }
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, PredictError> {
        if features.len() != self.mean.len() {
            return Err(PredictError::ShapeMismatch {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (mean, scale))| {
                // Constant columns were fitted with zero variance
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_standardizes() {
        let scaler = StandardScaler::new(vec![10.0, 0.0], vec![2.0, 4.0]).unwrap();
        let out = scaler.transform(&[14.0, -8.0]).unwrap();
        assert_eq!(out, vec![2.0, -2.0]);
    }

    #[test]
    fn test_zero_scale_treated_as_one() {
        let scaler = StandardScaler::new(vec![1.0], vec![0.0]).unwrap();
        assert_eq!(scaler.transform(&[3.0]).unwrap(), vec![2.0]);
    }

    #[test]
    fn test_shape_mismatch() {
        let scaler = StandardScaler::new(vec![0.0; 6], vec![1.0; 6]).unwrap();
        let err = scaler.transform(&[1.0; 5]).unwrap_err();
        assert_eq!(
            err,
            PredictError::ShapeMismatch {
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn test_from_json() {
        let json = br#"{"mean": [1, 2, 3, 4, 5, 6], "scale": [1, 1, 1, 1, 1, 1]}"#;
        let scaler = StandardScaler::from_json(json).unwrap();
        assert_eq!(scaler.n_features(), 6);
    }

    #[test]
    fn test_from_json_length_mismatch() {
        let json = br#"{"mean": [1, 2, 3], "scale": [1, 1]}"#;
        let err = StandardScaler::from_json(json).unwrap_err();
        assert!(err.contains("mean has 3 entries"), "{}", err);
    }

    #[test]
    fn test_from_json_column_order_checked() {
        let json = br#"{
            "mean": [0, 0, 0, 0, 0, 0],
            "scale": [1, 1, 1, 1, 1, 1],
            "feature_names": ["humidity", "temperature", "time_of_day", "day_of_week", "occupancy", "appliance_usage"]
        }"#;
        assert!(StandardScaler::from_json(json).is_err());

        let json = br#"{
            "mean": [0, 0, 0, 0, 0, 0],
            "scale": [1, 1, 1, 1, 1, 1],
            "feature_names": ["temperature", "humidity", "time_of_day", "day_of_week", "occupancy", "appliance_usage"]
        }"#;
        assert!(StandardScaler::from_json(json).is_ok());
    }

    #[test]
    fn test_from_json_garbage() {
        assert!(StandardScaler::from_json(b"\x00\x01not json").is_err());
    }
}
