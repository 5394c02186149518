// crates/types/src/query.rs
//! Submission payload for a plate lookup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default captcha retry budget the backend applies per job.
pub const DEFAULT_MAX_RETRIES: u8 = 3;

/// Upper bound the backend accepts for `max_retries`.
pub const MAX_RETRIES_LIMIT: u8 = 10;

/// Vehicle category understood by the lookup backend.
///
/// Serialized as the backend's canonical values; the English aliases it
/// also accepts are parsed on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    #[serde(rename = "oto", alias = "car")]
    Car,
    #[default]
    #[serde(rename = "xemay", alias = "motorcycle")]
    Motorcycle,
    #[serde(rename = "xedapdien", alias = "electric_bike")]
    ElectricBike,
}

impl VehicleType {
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleType::Car => "oto",
            VehicleType::Motorcycle => "xemay",
            VehicleType::ElectricBike => "xedapdien",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown vehicle type: {0}")]
pub struct UnknownVehicleType(pub String);

impl FromStr for VehicleType {
    type Err = UnknownVehicleType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oto" | "car" => Ok(VehicleType::Car),
            "xemay" | "motorcycle" => Ok(VehicleType::Motorcycle),
            "xedapdien" | "electric_bike" | "electric-bike" => Ok(VehicleType::ElectricBike),
            _ => Err(UnknownVehicleType(s.to_string())),
        }
    }
}

/// Body of a job submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupQuery {
    pub license_plate: String,
    pub vehicle_type: VehicleType,
    pub max_retries: u8,
}

impl LookupQuery {
    pub fn new(license_plate: impl Into<String>, vehicle_type: VehicleType) -> Self {
        Self {
            license_plate: license_plate.into(),
            vehicle_type,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Set the captcha retry budget, clamped to what the backend accepts.
    pub fn with_max_retries(mut self, max_retries: u8) -> Self {
        self.max_retries = max_retries.clamp(1, MAX_RETRIES_LIMIT);
        self
    }
}
