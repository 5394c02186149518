// crates/types/src/job.rs
//! Job identity, status and the snapshot returned by each status query.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::query::VehicleType;
use crate::report::ViolationReport;

/// Opaque identifier assigned to a lookup job by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Status of a backend lookup job.
///
/// `Completed` and `Failed` are terminal: once a job reports either, it is
/// never polled again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response of a successful job submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTicket {
    pub job_id: JobId,
    pub status: JobStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// One status query result for a job.
///
/// `result` is only meaningful when `status` is `Completed`, `error` only
/// when it is `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub job_id: JobId,
    pub status: JobStatus,
    #[serde(default)]
    pub license_plate: String,
    #[serde(default)]
    pub vehicle_type: Option<VehicleType>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub result: Option<ViolationReport>,
    #[serde(default)]
    pub error: Option<String>,
}

impl JobSnapshot {
    /// Bare snapshot carrying only an id and a status.
    pub fn new(job_id: impl Into<JobId>, status: JobStatus) -> Self {
        Self {
            job_id: job_id.into(),
            status,
            license_plate: String::new(),
            vehicle_type: None,
            created_at: None,
            completed_at: None,
            result: None,
            error: None,
        }
    }

    pub fn with_result(mut self, result: ViolationReport) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Error message of a failed job. `None` for every other status, and for
    /// failures the backend reported without a message.
    pub fn failure_message(&self) -> Option<&str> {
        match self.status {
            JobStatus::Failed => self.error.as_deref().filter(|m| !m.is_empty()),
            _ => None,
        }
    }
}
