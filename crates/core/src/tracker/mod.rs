// crates/core/src/tracker/mod.rs
//! Tracks one backend job from submission to a terminal status.
//!
//! Provides:
//! - `JobTracker`: owns at most one polling session at a time
//! - `TrackerOptions`: job id, enable gate and cadence
//! - `TrackerState`: the observable `(phase, job, is_polling, error)` view
//!
//! A session polls immediately, then every `interval`, and stops on the
//! first `completed`/`failed` snapshot or fetch failure. At most one of
//! `on_complete`/`on_error` fires per session; `on_error` needs a failure
//! that carries a message or comes from the fetch itself.

mod options;
mod session;
mod state;

pub use options::{TrackerOptions, DEFAULT_POLL_INTERVAL};
pub use state::{CompleteCallback, ErrorCallback, TrackerPhase, TrackerState};

use std::sync::Arc;
use std::time::Duration;

use plate_watch_types::{JobId, JobSnapshot};
use tokio::sync::watch;

use crate::api::JobStatusFetcher;
use crate::error::{OptionsError, TrackerError};
use session::Session;
use state::Shared;

/// Watches a single job through a [`JobStatusFetcher`].
///
/// Only changes to `job_id`, `enabled` or `interval` restart polling.
/// Callbacks can be replaced at any time; the running session always
/// invokes the latest ones.
pub struct JobTracker {
    fetcher: Arc<dyn JobStatusFetcher>,
    shared: Arc<Shared>,
    options: TrackerOptions,
    session: Option<Session>,
}

impl JobTracker {
    /// Create an idle tracker.
    pub fn new(fetcher: Arc<dyn JobStatusFetcher>) -> Self {
        Self {
            fetcher,
            shared: Arc::new(Shared::new()),
            options: TrackerOptions::default(),
            session: None,
        }
    }

    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }

    /// Register the callback fired when a session sees `completed`.
    pub fn on_complete<F>(&self, callback: F)
    where
        F: Fn(&JobSnapshot) + Send + Sync + 'static,
    {
        self.shared.set_on_complete(Arc::new(callback));
    }

    /// Register the callback fired on a reported failure with a message or
    /// a failed poll.
    pub fn on_error<F>(&self, callback: F)
    where
        F: Fn(&TrackerError) + Send + Sync + 'static,
    {
        self.shared.set_on_error(Arc::new(callback));
    }

    /// Apply new options, restarting the session if they differ from the
    /// current ones. The previous session is fully torn down before the
    /// next one starts.
    pub async fn configure(&mut self, options: TrackerOptions) -> Result<(), OptionsError> {
        options.validate()?;
        self.apply_options(options).await;
        Ok(())
    }

    /// Start tracking `job_id` with the current `enabled`/`interval`.
    pub async fn track(&mut self, job_id: impl Into<JobId>) {
        let options = self.options.clone().with_job_id(Some(job_id.into()));
        self.apply_options(options).await;
    }

    pub async fn set_enabled(&mut self, enabled: bool) {
        let options = self.options.clone().with_enabled(enabled);
        self.apply_options(options).await;
    }

    pub async fn set_interval(&mut self, interval: Duration) -> Result<(), OptionsError> {
        let options = self.options.clone().with_interval(interval);
        self.configure(options).await
    }

    /// Stop tracking and clear the observable state.
    pub async fn stop(&mut self) {
        let options = self.options.clone().with_job_id(None);
        self.apply_options(options).await;
    }

    pub fn state(&self) -> TrackerState {
        self.shared.current()
    }

    pub fn phase(&self) -> TrackerPhase {
        self.shared.current().phase
    }

    /// Latest snapshot of the current session.
    pub fn snapshot(&self) -> Option<JobSnapshot> {
        self.shared.current().job
    }

    pub fn is_polling(&self) -> bool {
        self.shared.current().is_polling
    }

    pub fn last_error(&self) -> Option<TrackerError> {
        self.shared.current().error
    }

    /// Receive every observable state change.
    pub fn subscribe(&self) -> watch::Receiver<TrackerState> {
        self.shared.subscribe()
    }

    /// Wait until no session is polling and return the state at that point.
    pub async fn wait_until_settled(&self) -> TrackerState {
        let mut rx = self.shared.subscribe();
        let settled = match rx.wait_for(|state| !state.is_polling).await {
            Ok(state) => Some(state.clone()),
            Err(_) => None,
        };
        settled.unwrap_or_else(|| self.state())
    }

    async fn apply_options(&mut self, options: TrackerOptions) {
        if options == self.options {
            return;
        }

        self.teardown().await;
        self.options = options;

        if let Some(job_id) = self.options.active_job().cloned() {
            self.session = Some(Session::spawn(
                job_id,
                self.options.interval,
                Arc::clone(&self.fetcher),
                Arc::clone(&self.shared),
            ));
        }
    }

    /// Invalidate the current generation, then stop its task. A no-op when
    /// nothing is being tracked.
    async fn teardown(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.shared.reset();
        session.shutdown().await;
    }
}

impl Drop for JobTracker {
    /// Invalidates the running session before signalling it, so a poll that
    /// is already past its cancellation check cannot report back.
    fn drop(&mut self) {
        if let Some(session) = &self.session {
            self.shared.reset();
            session.cancel();
        }
    }
}
