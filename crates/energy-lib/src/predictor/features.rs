//! Feature encoding for ML inference
//!
//! Turns a validated household reading into the exact numeric vector the
//! fitted scaler expects. Column order is a hard coupling with the scaler's
//! fitted parameters: reordering here without refitting the scaler silently
//! corrupts every prediction.

use crate::models::{FeatureVector, RawInputs};

/// Number of features produced by the encoder
pub const NUM_FEATURES: usize = 6;

/// Column names, in the order the scaler was fitted on
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "temperature",
    "humidity",
    "time_of_day",
    "day_of_week",
    "occupancy",
    "appliance_usage",
];

/// Encodes raw inputs into the model's feature vector
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode in `FEATURE_NAMES` order. Ranges are trusted, not re-checked.
    pub fn encode(&self, inputs: &RawInputs) -> FeatureVector {
        FeatureVector::from_values(vec![
            inputs.temperature(),
            inputs.humidity(),
            inputs.decimal_hour(),
            inputs.day_of_week().index() as f64,
            inputs.occupancy() as f64,
            inputs.appliance_usage(),
        ])
    }
}
