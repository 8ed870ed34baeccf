//! Backend job API abstraction

use async_trait::async_trait;

use crate::domain::{JobHandle, JobRequest};
use crate::error::Result;

/// Remote job operations the orchestration core depends on.
///
/// Implementations must be safe to share across tasks; the poller and the
/// sweep submitter both hold the same instance.
#[async_trait]
pub trait JobApi: Send + Sync {
    /// Create a job from a request and return its initial detail
    async fn create_job(&self, request: &JobRequest) -> Result<JobHandle>;

    /// Fetch the current detail of an existing job
    async fn fetch_job(&self, job_id: &str) -> Result<JobHandle>;

    /// Ask the backend to cancel a job.
    ///
    /// Cancellation is asynchronous on the backend side; the returned
    /// detail usually still reports an unsettled status.
    async fn cancel_job(&self, job_id: &str) -> Result<JobHandle>;
}
