// crates/core/src/tracker/session.rs
//! One tracking session: a spawned task polling a single job on a timer.

use std::sync::Arc;
use std::time::Duration;

use plate_watch_types::JobId;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::state::{Applied, Shared};
use crate::api::JobStatusFetcher;

/// Handle to a running (or finished) session task.
pub(crate) struct Session {
    job_id: JobId,
    generation: u64,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Session {
    /// Open a new generation in `shared` and start polling `job_id`.
    pub(crate) fn spawn(
        job_id: JobId,
        interval: Duration,
        fetcher: Arc<dyn JobStatusFetcher>,
        shared: Arc<Shared>,
    ) -> Self {
        let generation = shared.begin_session();
        let cancel = CancellationToken::new();

        tracing::info!(
            job_id = %job_id,
            generation,
            interval_ms = millis(interval),
            "Tracking session started"
        );

        let handle = tokio::spawn(run_session(
            job_id.clone(),
            generation,
            interval,
            fetcher,
            shared,
            cancel.clone(),
        ));

        Self {
            job_id,
            generation,
            cancel,
            handle,
        }
    }

    /// Signal the task to stop without waiting for it.
    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Stop the task and wait until it has exited, so nothing it owns can
    /// run afterwards.
    pub(crate) async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            if e.is_panic() {
                tracing::warn!(
                    job_id = %self.job_id,
                    generation = self.generation,
                    "Tracking session panicked: {e}"
                );
            }
        }
        tracing::debug!(
            job_id = %self.job_id,
            generation = self.generation,
            "Tracking session torn down"
        );
    }
}

fn millis(interval: Duration) -> u64 {
    u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)
}

/// Poll `job_id` every `interval` until a terminal result, a fetch failure,
/// or cancellation.
///
/// The first tick fires immediately. Missed ticks are skipped, so a slow
/// poll delays the next one instead of stacking a burst behind it.
async fn run_session(
    job_id: JobId,
    generation: u64,
    interval: Duration,
    fetcher: Arc<dyn JobStatusFetcher>,
    shared: Arc<Shared>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut poll = 0u64;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }

        poll += 1;
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(job_id = %job_id, generation, poll, "Discarding in-flight poll");
                return;
            }
            outcome = fetcher.fetch_status(&job_id) => outcome,
        };

        match shared.apply(generation, outcome) {
            Applied::Stale => {
                tracing::debug!(job_id = %job_id, generation, poll, "Session superseded");
                return;
            }
            Applied::Continue(status) => {
                tracing::debug!(job_id = %job_id, poll, status = %status, "Job still in progress");
            }
            Applied::Completed(snapshot) => {
                tracing::info!(job_id = %job_id, poll, "Job completed");
                shared.notify_complete(&snapshot);
                return;
            }
            Applied::Failed(Some(error)) => {
                tracing::warn!(job_id = %job_id, poll, error = %error, "Job tracking failed");
                shared.notify_error(&error);
                return;
            }
            Applied::Failed(None) => {
                tracing::info!(job_id = %job_id, poll, "Job failed without an error message");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_saturates() {
        assert_eq!(millis(Duration::from_millis(3000)), 3000);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }
}
