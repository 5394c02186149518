// crates/core/src/tracker/state.rs
//! Observable tracker state and the cell shared with the session task.

use std::sync::{Arc, RwLock};

use plate_watch_types::{JobSnapshot, JobStatus};
use tokio::sync::watch;

use crate::error::{FetchError, TrackerError};

pub type CompleteCallback = Arc<dyn Fn(&JobSnapshot) + Send + Sync>;
pub type ErrorCallback = Arc<dyn Fn(&TrackerError) + Send + Sync>;

/// Where the tracker is in its lifecycle.
///
/// `Idle -> Polling -> {Completed | Failed}`. The terminal phases only go
/// back to `Idle` through a configuration change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackerPhase {
    #[default]
    Idle,
    Polling,
    Completed,
    Failed,
}

impl TrackerPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, TrackerPhase::Completed | TrackerPhase::Failed)
    }
}

/// Everything a caller can observe about the tracked job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerState {
    pub phase: TrackerPhase,
    /// Latest snapshot of the current session.
    pub job: Option<JobSnapshot>,
    pub is_polling: bool,
    pub error: Option<TrackerError>,
    generation: u64,
}

impl TrackerState {
    /// Session counter. Bumped on every session start and teardown.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outcome of applying one poll result.
#[derive(Debug)]
pub(crate) enum Applied {
    /// The session that issued the poll is no longer current.
    Stale,
    Continue(JobStatus),
    Completed(JobSnapshot),
    /// `None` when the backend failed the job without a message.
    Failed(Option<TrackerError>),
}

#[derive(Default)]
struct Callbacks {
    on_complete: Option<CompleteCallback>,
    on_error: Option<ErrorCallback>,
}

/// State cell shared between a [`JobTracker`](super::JobTracker) and its
/// session task.
///
/// The generation lives inside the watched value so the staleness check and
/// the mutation happen under the same lock.
pub(crate) struct Shared {
    state: watch::Sender<TrackerState>,
    callbacks: RwLock<Callbacks>,
}

impl Shared {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(TrackerState::default());
        Self {
            state,
            callbacks: RwLock::new(Callbacks::default()),
        }
    }

    pub(crate) fn current(&self) -> TrackerState {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<TrackerState> {
        self.state.subscribe()
    }

    pub(crate) fn set_on_complete(&self, callback: CompleteCallback) {
        match self.callbacks.write() {
            Ok(mut guard) => guard.on_complete = Some(callback),
            Err(e) => tracing::error!("RwLock poisoned writing on_complete: {e}"),
        }
    }

    pub(crate) fn set_on_error(&self, callback: ErrorCallback) {
        match self.callbacks.write() {
            Ok(mut guard) => guard.on_error = Some(callback),
            Err(e) => tracing::error!("RwLock poisoned writing on_error: {e}"),
        }
    }

    /// Start a new session: fresh state, polling, and a new generation.
    pub(crate) fn begin_session(&self) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            state.phase = TrackerPhase::Polling;
            state.job = None;
            state.error = None;
            state.is_polling = true;
            generation = state.generation;
        });
        generation
    }

    /// Invalidate the current session and return to `Idle`.
    ///
    /// Subscribers are only notified if something observable changed.
    pub(crate) fn reset(&self) {
        self.state.send_if_modified(|state| {
            state.generation += 1;
            let was_idle = state.phase == TrackerPhase::Idle
                && state.job.is_none()
                && state.error.is_none()
                && !state.is_polling;
            state.phase = TrackerPhase::Idle;
            state.job = None;
            state.error = None;
            state.is_polling = false;
            !was_idle
        });
    }

    /// Apply a poll result issued by session `generation`.
    pub(crate) fn apply(
        &self,
        generation: u64,
        outcome: Result<JobSnapshot, FetchError>,
    ) -> Applied {
        let mut applied = Applied::Stale;
        self.state.send_if_modified(|state| {
            if state.generation != generation || state.phase != TrackerPhase::Polling {
                return false;
            }

            applied = match outcome {
                Ok(snapshot) => match snapshot.status {
                    JobStatus::Pending | JobStatus::Running => {
                        let status = snapshot.status;
                        state.job = Some(snapshot);
                        Applied::Continue(status)
                    }
                    JobStatus::Completed => {
                        state.phase = TrackerPhase::Completed;
                        state.is_polling = false;
                        state.job = Some(snapshot.clone());
                        Applied::Completed(snapshot)
                    }
                    JobStatus::Failed => {
                        let error = snapshot.failure_message().map(|message| {
                            TrackerError::job_failed(snapshot.job_id.clone(), message)
                        });
                        state.phase = TrackerPhase::Failed;
                        state.is_polling = false;
                        state.error = error.clone();
                        state.job = Some(snapshot);
                        Applied::Failed(error)
                    }
                },
                Err(e) => {
                    let error = TrackerError::Fetch(e);
                    state.phase = TrackerPhase::Failed;
                    state.is_polling = false;
                    state.error = Some(error.clone());
                    Applied::Failed(Some(error))
                }
            };
            true
        });
        applied
    }

    /// Invoke the most recently registered `on_complete`, if any.
    pub(crate) fn notify_complete(&self, snapshot: &JobSnapshot) {
        let callback = match self.callbacks.read() {
            Ok(guard) => guard.on_complete.clone(),
            Err(e) => {
                tracing::error!("RwLock poisoned reading on_complete: {e}");
                None
            }
        };
        if let Some(callback) = callback {
            callback(snapshot);
        }
    }

    /// Invoke the most recently registered `on_error`, if any.
    pub(crate) fn notify_error(&self, error: &TrackerError) {
        let callback = match self.callbacks.read() {
            Ok(guard) => guard.on_error.clone(),
            Err(e) => {
                tracing::error!("RwLock poisoned reading on_error: {e}");
                None
            }
        };
        if let Some(callback) = callback {
            callback(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plate_watch_types::JobId;

    #[test]
    fn test_begin_session_resets_and_bumps_generation() {
        let shared = Shared::new();
        let first = shared.begin_session();
        shared.apply(first, Err(FetchError::Transport("down".into())));
        assert_eq!(shared.current().phase, TrackerPhase::Failed);

        let second = shared.begin_session();
        assert!(second > first);
        let state = shared.current();
        assert_eq!(state.phase, TrackerPhase::Polling);
        assert!(state.is_polling);
        assert!(state.error.is_none());
        assert!(state.job.is_none());
        assert_eq!(state.generation(), second);
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let shared = Shared::new();
        let old = shared.begin_session();
        let _new = shared.begin_session();

        let applied = shared.apply(old, Ok(JobSnapshot::new("abc", JobStatus::Completed)));
        assert!(matches!(applied, Applied::Stale));
        assert_eq!(shared.current().phase, TrackerPhase::Polling);
        assert!(shared.current().job.is_none());
    }

    #[test]
    fn test_terminal_phase_never_regresses() {
        let shared = Shared::new();
        let generation = shared.begin_session();

        let applied = shared.apply(generation, Ok(JobSnapshot::new("abc", JobStatus::Completed)));
        assert!(matches!(applied, Applied::Completed(_)));

        let late = shared.apply(generation, Ok(JobSnapshot::new("abc", JobStatus::Running)));
        assert!(matches!(late, Applied::Stale));
        let state = shared.current();
        assert_eq!(state.phase, TrackerPhase::Completed);
        assert_eq!(state.job.map(|j| j.status), Some(JobStatus::Completed));
    }

    #[test]
    fn test_failed_with_message_records_error() {
        let shared = Shared::new();
        let generation = shared.begin_session();
        let snapshot = JobSnapshot::new("abc", JobStatus::Failed).with_error("captcha timeout");

        match shared.apply(generation, Ok(snapshot)) {
            Applied::Failed(Some(err)) => {
                assert_eq!(err, TrackerError::job_failed(JobId::new("abc"), "captcha timeout"))
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(shared.current().error.is_some());
    }

    #[test]
    fn test_failed_without_message_is_silent() {
        let shared = Shared::new();
        let generation = shared.begin_session();

        let applied = shared.apply(generation, Ok(JobSnapshot::new("abc", JobStatus::Failed)));
        assert!(matches!(applied, Applied::Failed(None)));
        let state = shared.current();
        assert_eq!(state.phase, TrackerPhase::Failed);
        assert!(!state.is_polling);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let shared = Shared::new();
        let mut rx = shared.subscribe();

        shared.reset();
        assert!(!rx.has_changed().unwrap());

        shared.begin_session();
        rx.mark_unchanged();
        shared.reset();
        assert!(rx.has_changed().unwrap());
        assert_eq!(shared.current().phase, TrackerPhase::Idle);
    }

    #[test]
    fn test_latest_callback_wins() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let shared = Shared::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&first);
        shared.set_on_complete(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let counter = Arc::clone(&second);
        shared.set_on_complete(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        shared.notify_complete(&JobSnapshot::new("abc", JobStatus::Completed));
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }
}
