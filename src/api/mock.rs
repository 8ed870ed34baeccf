//! Scripted in-memory job API for tests and offline wiring checks

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use crate::api::client::JobApi;
use crate::domain::{JobHandle, JobRequest, JobStatus};
use crate::error::{DeskError, Result};

/// In-memory `JobApi` that replays scripted job details.
///
/// Each `fetch_job` call pops the next scripted detail for that id; once a
/// script runs out its last detail repeats, mirroring a backend whose job
/// settled. Failures can be injected per call to exercise error paths.
#[derive(Debug, Default)]
pub struct MockJobApi {
    scripts: Mutex<HashMap<String, Vec<JobHandle>>>,
    cursors: Mutex<HashMap<String, usize>>,
    created: Mutex<Vec<JobRequest>>,
    cancelled: Mutex<Vec<String>>,
    fetch_count: AtomicU32,
    failing_fetches: AtomicU32,
    fail_create_at: Mutex<Option<usize>>,
}

impl MockJobApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the sequence of details `fetch_job` returns for a job id
    pub fn script_job(&self, job_id: impl Into<String>, details: Vec<JobHandle>) {
        self.scripts.lock().unwrap().insert(job_id.into(), details);
    }

    /// Make the next `count` fetches fail with a 503 before any script is
    /// consulted
    pub fn fail_next_fetches(&self, count: u32) {
        self.failing_fetches.store(count, Ordering::SeqCst);
    }

    /// Make the creation call at `index` (zero-based) fail with a 500
    pub fn fail_create_at(&self, index: usize) {
        *self.fail_create_at.lock().unwrap() = Some(index);
    }

    /// Total `fetch_job` calls, including injected failures
    pub fn fetch_calls(&self) -> u32 {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Requests accepted by `create_job`, in call order
    pub fn created_requests(&self) -> Vec<JobRequest> {
        self.created.lock().unwrap().clone()
    }

    /// Job ids passed to `cancel_job`, in call order
    pub fn cancelled_ids(&self) -> Vec<String> {
        self.cancelled.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobApi for MockJobApi {
    async fn create_job(&self, request: &JobRequest) -> Result<JobHandle> {
        let mut created = self.created.lock().unwrap();
        if *self.fail_create_at.lock().unwrap() == Some(created.len()) {
            return Err(DeskError::Api {
                status: 500,
                message: "injected create failure".to_string(),
            });
        }
        created.push(request.clone());
        let job_id = format!("job-{}", created.len());
        Ok(JobHandle::new(job_id, Some(request.kind), JobStatus::Queued))
    }

    async fn fetch_job(&self, job_id: &str) -> Result<JobHandle> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        let injected_failure = self
            .failing_fetches
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected_failure {
            return Err(DeskError::Api {
                status: 503,
                message: "injected fetch failure".to_string(),
            });
        }

        let scripts = self.scripts.lock().unwrap();
        let Some(script) = scripts.get(job_id).filter(|details| !details.is_empty()) else {
            return Err(DeskError::Api {
                status: 404,
                message: format!("no scripted detail for job {}", job_id),
            });
        };

        let mut cursors = self.cursors.lock().unwrap();
        let cursor = cursors.entry(job_id.to_string()).or_insert(0);
        let detail = script[(*cursor).min(script.len() - 1)].clone();
        *cursor += 1;
        Ok(detail)
    }

    async fn cancel_job(&self, job_id: &str) -> Result<JobHandle> {
        self.cancelled.lock().unwrap().push(job_id.to_string());
        Ok(JobHandle::new(job_id, None, JobStatus::CancelRequested))
    }
}
