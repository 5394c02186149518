// crates/core/src/tracker/options.rs
//! Options that select which job a tracker watches and how often.

use std::time::Duration;

use plate_watch_types::JobId;

use crate::error::OptionsError;

/// Polling cadence used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Tracker configuration. Changing any field restarts the tracking session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerOptions {
    /// Job to watch; `None` tracks nothing.
    pub job_id: Option<JobId>,
    /// When false no polling happens regardless of `job_id`.
    pub enabled: bool,
    pub interval: Duration,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            job_id: None,
            enabled: true,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl TrackerOptions {
    /// Track `job_id` with the default cadence.
    pub fn new(job_id: impl Into<JobId>) -> Self {
        Self {
            job_id: Some(job_id.into()),
            ..Self::default()
        }
    }

    pub fn with_job_id(mut self, job_id: Option<JobId>) -> Self {
        self.job_id = job_id;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.interval.is_zero() {
            return Err(OptionsError::ZeroInterval);
        }
        Ok(())
    }

    /// The job a session should run for, if any.
    pub(crate) fn active_job(&self) -> Option<&JobId> {
        if self.enabled {
            self.job_id.as_ref()
        } else {
            None
        }
    }
}
