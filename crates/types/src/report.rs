// crates/types/src/report.rs
//! Violation report carried by a completed lookup job.

use serde::{Deserialize, Serialize};

/// Result payload of a completed job. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationReport {
    #[serde(default)]
    pub license_plate: String,
    #[serde(default)]
    pub vehicle_type: String,
    #[serde(default)]
    pub violation_found: bool,
    #[serde(default)]
    pub violation_details: Vec<ViolationDetail>,
    #[serde(default)]
    pub scraped_at: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Scraper outcome: "success", "partial" or "error".
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ViolationReport {
    pub fn violation_count(&self) -> usize {
        if self.violation_found {
            self.violation_details.len()
        } else {
            0
        }
    }
}

/// One recorded violation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationDetail {
    #[serde(default)]
    pub license_plate: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub vehicle_color: Option<String>,
    #[serde(default)]
    pub violation_time: Option<String>,
    #[serde(default)]
    pub violation_location: Option<String>,
    #[serde(default)]
    pub violation_behavior: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub detecting_unit: Option<String>,
    #[serde(default)]
    pub resolution_location: Option<String>,
}
