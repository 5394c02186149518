// crates/core/src/client.rs
//! REST client for the plate lookup backend.
//!
//! Implements [`JobSubmitter`] and [`JobStatusFetcher`] over `reqwest`:
//! - `POST /api/v1/scrape` creates a job
//! - `GET /api/v1/jobs/{job_id}` reports its status
//! - `GET /health` checks the backend is up

use async_trait::async_trait;
use plate_watch_types::{JobId, JobSnapshot, JobTicket, LookupQuery};
use reqwest::StatusCode;

use crate::api::{JobStatusFetcher, JobSubmitter};
use crate::config::ClientConfig;
use crate::error::{FetchError, SubmissionError};

/// HTTP client for one lookup backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// * `base_url` - e.g. `http://localhost:8000`. A trailing `/` is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling, custom TLS).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Build a client with the configured request timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config.api_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the backend answers its health endpoint.
    pub async fn health_check(&self) -> Result<(), FetchError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: read_body(response).await,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl JobSubmitter for ApiClient {
    async fn submit(&self, query: &LookupQuery) -> Result<JobTicket, SubmissionError> {
        let response = self
            .client
            .post(format!("{}/api/v1/scrape", self.base_url))
            .json(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmissionError::Status {
                status: status.as_u16(),
                body: read_body(response).await,
            });
        }

        let ticket = response.json::<JobTicket>().await?;
        tracing::debug!(
            job_id = %ticket.job_id,
            license_plate = %query.license_plate,
            vehicle_type = %query.vehicle_type,
            "Lookup job submitted"
        );
        Ok(ticket)
    }
}

#[async_trait]
impl JobStatusFetcher for ApiClient {
    async fn fetch_status(&self, job_id: &JobId) -> Result<JobSnapshot, FetchError> {
        let response = self
            .client
            .get(format!("{}/api/v1/jobs/{}", self.base_url, job_id))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(job_id.clone()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: read_body(response).await,
            });
        }

        Ok(response.json::<JobSnapshot>().await?)
    }
}

async fn read_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string())
}
