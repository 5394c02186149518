// crates/core/src/api.rs
//! Collaborator traits for the lookup backend.
//!
//! The tracker and the lookup controller only see these two seams, so the
//! transport can be swapped (HTTP in production, scripted fakes in tests).

use async_trait::async_trait;
use plate_watch_types::{JobId, JobSnapshot, JobTicket, LookupQuery};

use crate::error::{FetchError, SubmissionError};

/// Creates lookup jobs.
#[async_trait]
pub trait JobSubmitter: Send + Sync {
    /// Submit a query and return the ticket carrying the new job id.
    async fn submit(&self, query: &LookupQuery) -> Result<JobTicket, SubmissionError>;
}

/// Queries the current status of a lookup job.
#[async_trait]
pub trait JobStatusFetcher: Send + Sync {
    async fn fetch_status(&self, job_id: &JobId) -> Result<JobSnapshot, FetchError>;
}
