//! Severity classification of predicted consumption

use serde::{Deserialize, Serialize};
use std::fmt;

/// Predictions above this many kWh are `High`
pub const HIGH_THRESHOLD_KWH: f64 = 7.0;

/// Predictions above this many kWh (and up to `HIGH_THRESHOLD_KWH`) are `Moderate`
pub const MODERATE_THRESHOLD_KWH: f64 = 4.0;

/// Severity band of a prediction, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Efficient,
    Moderate,
    High,
}

impl SeverityLevel {
    /// Classify a prediction. Upper bounds are inclusive, so exactly 4.0 is
    /// `Efficient` and exactly 7.0 is `Moderate`. Negative values and NaN
    /// fall through to `Efficient`.
    pub fn classify(prediction_kwh: f64) -> Self {
        if prediction_kwh > HIGH_THRESHOLD_KWH {
            SeverityLevel::High
        } else if prediction_kwh > MODERATE_THRESHOLD_KWH {
            SeverityLevel::Moderate
        } else {
            SeverityLevel::Efficient
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::Efficient => "efficient",
            SeverityLevel::Moderate => "moderate",
            SeverityLevel::High => "high",
        }
    }

    /// Short banner shown next to the prediction
    pub fn headline(&self) -> &'static str {
        match self {
            SeverityLevel::High => "High Energy Usage Alert!",
            SeverityLevel::Moderate => "Moderate Energy Usage",
            SeverityLevel::Efficient => "Efficient Energy Usage",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            SeverityLevel::High => "Consider reducing appliance usage or adjusting temperature.",
            SeverityLevel::Moderate => "Your energy usage is within normal range.",
            SeverityLevel::Efficient => "Great job maintaining low energy consumption!",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
