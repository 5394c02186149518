// crates/core/src/error.rs
use plate_watch_types::JobId;
use thiserror::Error;

/// Errors that can occur when creating a lookup job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Submission request failed: {0}")]
    Transport(String),

    #[error("Submission rejected ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Malformed submission response: {0}")]
    Decode(String),
}

/// Errors from a single status query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Status request failed: {0}")]
    Transport(String),

    #[error("Job not found: {0}")]
    NotFound(JobId),

    #[error("Status request returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed status response: {0}")]
    Decode(String),
}

/// Failure recorded by a tracking session and passed to `on_error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// The poll itself failed. Terminal for the session.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The backend reported the job as failed with a message.
    #[error("{message}")]
    JobFailed { job_id: JobId, message: String },
}

impl TrackerError {
    pub fn job_failed(job_id: JobId, message: impl Into<String>) -> Self {
        Self::JobFailed {
            job_id,
            message: message.into(),
        }
    }
}

/// Rejected tracker options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("Polling interval must be greater than zero")]
    ZeroInterval,
}

/// Errors produced by plate normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlateError {
    #[error("License plate is empty")]
    Empty,

    #[error("License plate is not valid: {0}")]
    Invalid(String),
}

/// Errors surfaced by [`crate::lookup::PlateLookup::search`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error(transparent)]
    Plate(#[from] PlateError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<reqwest::Error> for SubmissionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_failed_displays_backend_message() {
        let err = TrackerError::job_failed(JobId::new("abc"), "captcha timeout");
        assert_eq!(err.to_string(), "captcha timeout");
    }

    #[test]
    fn test_fetch_error_is_transparent_in_tracker_error() {
        let err: TrackerError = FetchError::Transport("connection refused".into()).into();
        assert_eq!(err.to_string(), "Status request failed: connection refused");
    }
}
