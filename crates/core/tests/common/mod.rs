//! In-memory collaborators shared by the tracker and lookup tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use plate_watch_core::{
    FetchError, JobStatusFetcher, JobSubmitter, JobTracker, SubmissionError, TrackerError,
};
use plate_watch_types::{JobId, JobSnapshot, JobStatus, JobTicket, LookupQuery, ViolationReport};
use tokio::sync::Notify;

/// One scripted reply to a status query.
pub enum Step {
    Reply(Result<JobSnapshot, FetchError>),
    /// Hold the reply until the gate is opened.
    Gated(Arc<Notify>, Result<JobSnapshot, FetchError>),
}

pub fn pending(job_id: &str) -> Step {
    Step::Reply(Ok(JobSnapshot::new(job_id, JobStatus::Pending)))
}

pub fn running(job_id: &str) -> Step {
    Step::Reply(Ok(JobSnapshot::new(job_id, JobStatus::Running)))
}

pub fn completed(job_id: &str) -> Step {
    Step::Reply(Ok(completed_snapshot(job_id)))
}

pub fn failed(job_id: &str, message: Option<&str>) -> Step {
    let mut snapshot = JobSnapshot::new(job_id, JobStatus::Failed);
    snapshot.error = message.map(str::to_string);
    Step::Reply(Ok(snapshot))
}

pub fn transport_error(message: &str) -> Step {
    Step::Reply(Err(FetchError::Transport(message.to_string())))
}

pub fn completed_snapshot(job_id: &str) -> JobSnapshot {
    JobSnapshot::new(job_id, JobStatus::Completed).with_result(ViolationReport {
        license_plate: "59C136047".into(),
        vehicle_type: "xemay".into(),
        violation_found: false,
        ..ViolationReport::default()
    })
}

/// Status fetcher answering from per-job scripts. Once a script runs out
/// the job keeps reporting `pending`.
#[derive(Default)]
pub struct ScriptedFetcher {
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    calls: AtomicUsize,
    requested: Mutex<Vec<JobId>>,
}

impl ScriptedFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, job_id: &str, steps: Vec<Step>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(job_id.to_string(), steps.into_iter().collect());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, job_id: &str) -> usize {
        self.requested
            .lock()
            .unwrap()
            .iter()
            .filter(|id| id.as_str() == job_id)
            .count()
    }
}

#[async_trait]
impl JobStatusFetcher for ScriptedFetcher {
    async fn fetch_status(&self, job_id: &JobId) -> Result<JobSnapshot, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(job_id.clone());

        let step = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(job_id.as_str())
            .and_then(|steps| steps.pop_front());

        match step {
            Some(Step::Reply(reply)) => reply,
            Some(Step::Gated(gate, reply)) => {
                gate.notified().await;
                reply
            }
            None => Ok(JobSnapshot::new(job_id.clone(), JobStatus::Pending)),
        }
    }
}

/// Submitter that hands out preset job ids, or a preset error.
pub struct StubSubmitter {
    replies: Mutex<VecDeque<Result<JobTicket, SubmissionError>>>,
    queries: Mutex<Vec<LookupQuery>>,
}

impl StubSubmitter {
    pub fn new(replies: Vec<Result<&str, SubmissionError>>) -> Arc<Self> {
        let replies = replies
            .into_iter()
            .map(|reply| {
                reply.map(|id| JobTicket {
                    job_id: JobId::new(id),
                    status: JobStatus::Pending,
                    message: "Job created successfully".into(),
                    created_at: None,
                })
            })
            .collect();
        Arc::new(Self {
            replies: Mutex::new(replies),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn queries(&self) -> Vec<LookupQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobSubmitter for StubSubmitter {
    async fn submit(&self, query: &LookupQuery) -> Result<JobTicket, SubmissionError> {
        self.queries.lock().unwrap().push(query.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SubmissionError::Transport("no scripted reply".into())))
    }
}

/// Records every callback invocation.
#[derive(Default)]
pub struct Recorder {
    pub completed: Mutex<Vec<JobSnapshot>>,
    pub errors: Mutex<Vec<TrackerError>>,
}

impl Recorder {
    pub fn attach(tracker: &JobTracker) -> Arc<Self> {
        let recorder = Arc::new(Self::default());

        let sink = Arc::clone(&recorder);
        tracker.on_complete(move |snapshot| sink.completed.lock().unwrap().push(snapshot.clone()));
        let sink = Arc::clone(&recorder);
        tracker.on_error(move |error| sink.errors.lock().unwrap().push(error.clone()));

        recorder
    }

    pub fn completed(&self) -> Vec<JobSnapshot> {
        self.completed.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<TrackerError> {
        self.errors.lock().unwrap().clone()
    }

    pub fn total(&self) -> usize {
        self.completed.lock().unwrap().len() + self.errors.lock().unwrap().len()
    }
}
