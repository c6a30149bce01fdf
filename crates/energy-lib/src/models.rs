//! Core data models for the energy optimizer
//!
//! `RawInputs` is the validated household reading that every evaluation
//! starts from. It can only be built through [`RawInputs::new`] or from the
//! loosely-typed [`RawInputsRequest`], so range checks happen once at the
//! boundary and never again downstream.

use crate::error::InputError;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Accepted indoor temperature in °C
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 10.0..=35.0;

/// Accepted relative humidity in %
pub const HUMIDITY_RANGE: RangeInclusive<f64> = 30.0..=80.0;

/// Accepted number of occupants
pub const OCCUPANCY_RANGE: RangeInclusive<u32> = 0..=10;

/// Accepted appliance usage level
pub const APPLIANCE_USAGE_RANGE: RangeInclusive<f64> = 0.0..=10.0;

/// Day of the week, in Monday-first order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Canonical ordering; a day's position here is its feature index
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Zero-based Monday-first index (Monday = 0, Sunday = 6)
    pub fn index(self) -> u8 {
        match self {
            DayOfWeek::Monday => 0,
            DayOfWeek::Tuesday => 1,
            DayOfWeek::Wednesday => 2,
            DayOfWeek::Thursday => 3,
            DayOfWeek::Friday => 4,
            DayOfWeek::Saturday => 5,
            DayOfWeek::Sunday => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayOfWeek {
    type Err = InputError;

    /// Only the seven full day names are accepted (ASCII case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        DayOfWeek::ALL
            .into_iter()
            .find(|day| day.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| InputError::UnknownDay(s.to_string()))
    }
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(weekday: chrono::Weekday) -> Self {
        DayOfWeek::ALL[weekday.num_days_from_monday() as usize]
    }
}

/// A validated household reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawInputs {
    temperature: f64,
    humidity: f64,
    time_of_day: NaiveTime,
    day_of_week: DayOfWeek,
    occupancy: u32,
    appliance_usage: f64,
}

impl RawInputs {
    /// Capture a reading, rejecting any field outside its documented range
    pub fn new(
        temperature: f64,
        humidity: f64,
        time_of_day: NaiveTime,
        day_of_week: DayOfWeek,
        occupancy: u32,
        appliance_usage: f64,
    ) -> Result<Self, InputError> {
        check_range("temperature", temperature, &TEMPERATURE_RANGE)?;
        check_range("humidity", humidity, &HUMIDITY_RANGE)?;
        check_range("appliance_usage", appliance_usage, &APPLIANCE_USAGE_RANGE)?;
        if !OCCUPANCY_RANGE.contains(&occupancy) {
            return Err(InputError::OutOfRange {
                field: "occupancy",
                value: occupancy as f64,
                min: *OCCUPANCY_RANGE.start() as f64,
                max: *OCCUPANCY_RANGE.end() as f64,
            });
        }

        Ok(Self {
            temperature,
            humidity,
            time_of_day,
            day_of_week,
            occupancy,
            appliance_usage,
        })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    pub fn time_of_day(&self) -> NaiveTime {
        self.time_of_day
    }

    /// Wall-clock time as a decimal hour in [0, 24)
    pub fn decimal_hour(&self) -> f64 {
        self.time_of_day.hour() as f64 + self.time_of_day.minute() as f64 / 60.0
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        self.day_of_week
    }

    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    pub fn appliance_usage(&self) -> f64 {
        self.appliance_usage
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    range: &RangeInclusive<f64>,
) -> Result<(), InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    if !range.contains(&value) {
        return Err(InputError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        });
    }
    Ok(())
}

/// Parse `HH:MM` (or `HH:MM:SS`) into a wall-clock time
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, InputError> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| InputError::InvalidTime(s.to_string()))
}

/// Inbound evaluation request as supplied by a presentation layer
///
/// Field types are loose (day name as text, time as `HH:MM`, signed
/// occupancy) so that out-of-domain values surface as an [`InputError`].
/// Bodies that do not fit these types at all are rejected by the caller's
/// decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInputsRequest {
    pub temperature: f64,
    pub humidity: f64,
    pub time_of_day: String,
    pub day_of_week: String,
    pub occupancy: i64,
    pub appliance_usage: f64,
}

impl Default for RawInputsRequest {
    fn default() -> Self {
        Self {
            temperature: 22.0,
            humidity: 50.0,
            time_of_day: "12:00".to_string(),
            day_of_week: "Monday".to_string(),
            occupancy: 2,
            appliance_usage: 5.0,
        }
    }
}

impl TryFrom<&RawInputsRequest> for RawInputs {
    type Error = InputError;

    fn try_from(req: &RawInputsRequest) -> Result<Self, Self::Error> {
        let time_of_day = parse_time_of_day(&req.time_of_day)?;
        let day_of_week = req.day_of_week.parse::<DayOfWeek>()?;
        let occupancy = u32::try_from(req.occupancy).map_err(|_| InputError::OutOfRange {
            field: "occupancy",
            value: req.occupancy as f64,
            min: *OCCUPANCY_RANGE.start() as f64,
            max: *OCCUPANCY_RANGE.end() as f64,
        })?;

        RawInputs::new(
            req.temperature,
            req.humidity,
            time_of_day,
            day_of_week,
            occupancy,
            req.appliance_usage,
        )
    }
}

/// Fixed-order numeric feature vector fed to the scaler
///
/// Produced with six entries by the encoder; arbitrary widths can be built
/// with [`FeatureVector::from_values`] and are rejected by the gateway when
/// they do not match the fitted scaler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn from_values(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
