//! Rule-based optimization recommendations
//!
//! Each rule is an independent predicate over the raw inputs paired with a
//! fixed message. Rules are evaluated in table order and never short-circuit,
//! so any subset of them can fire for a single reading.

use crate::models::RawInputs;
use serde::Serialize;

/// Lower edge of the comfortable temperature band in °C
pub const COMFORT_BAND_MIN_C: f64 = 20.0;

/// Upper edge of the comfortable temperature band in °C
pub const COMFORT_BAND_MAX_C: f64 = 24.0;

/// Appliance usage above which spreading load is advised
pub const HEAVY_USAGE_LEVEL: f64 = 7.0;

/// Appliance usage above which an empty home is considered wasteful
pub const STANDBY_USAGE_LEVEL: f64 = 2.0;

/// Shown by presentation layers when no rule fires
pub const OPTIMIZED_MESSAGE: &str = "Your current settings are optimized for energy efficiency!";

/// Identifier of a recommendation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    ComfortBand,
    SpreadUsage,
    StandbyPower,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::ComfortBand => "comfort_band",
            RuleId::SpreadUsage => "spread_usage",
            RuleId::StandbyPower => "standby_power",
        }
    }
}

/// A predicate over raw inputs paired with its advisory
#[derive(Clone, Copy)]
pub struct RecommendationRule {
    pub id: RuleId,
    pub message: &'static str,
    pub applies: fn(&RawInputs) -> bool,
}

impl std::fmt::Debug for RecommendationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationRule")
            .field("id", &self.id)
            .field("message", &self.message)
            .finish()
    }
}

/// Built-in rules, in evaluation order
pub const DEFAULT_RULES: [RecommendationRule; 3] = [
    RecommendationRule {
        id: RuleId::ComfortBand,
        message: "Adjust temperature to between 20-24°C for optimal efficiency.",
        applies: outside_comfort_band,
    },
    RecommendationRule {
        id: RuleId::SpreadUsage,
        message: "Consider spreading out appliance usage throughout the day.",
        applies: heavy_appliance_usage,
    },
    RecommendationRule {
        id: RuleId::StandbyPower,
        message: "Reduce standby power consumption when home is unoccupied.",
        applies: unoccupied_with_load,
    },
];

fn outside_comfort_band(inputs: &RawInputs) -> bool {
    inputs.temperature() < COMFORT_BAND_MIN_C || inputs.temperature() > COMFORT_BAND_MAX_C
}

fn heavy_appliance_usage(inputs: &RawInputs) -> bool {
    inputs.appliance_usage() > HEAVY_USAGE_LEVEL
}

fn unoccupied_with_load(inputs: &RawInputs) -> bool {
    inputs.occupancy() == 0 && inputs.appliance_usage() > STANDBY_USAGE_LEVEL
}

/// A fired rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub rule: RuleId,
    pub message: &'static str,
}

/// Evaluates an ordered rule table against raw inputs
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    rules: Vec<RecommendationRule>,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self::with_rules(DEFAULT_RULES.to_vec())
    }

    pub fn with_rules(rules: Vec<RecommendationRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RecommendationRule] {
        &self.rules
    }

    /// Every rule whose predicate holds, in table order. Empty means the
    /// reading is already optimal.
    pub fn recommend(&self, inputs: &RawInputs) -> Vec<Recommendation> {
        self.rules
            .iter()
            .filter(|rule| (rule.applies)(inputs))
            .map(|rule| Recommendation {
                rule: rule.id,
                message: rule.message,
            })
            .collect()
    }
}
