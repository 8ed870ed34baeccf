//! Bounded, supersedable polling of a single job

use std::time::Duration;

use tracing::debug;

use crate::api::JobApi;
use crate::domain::{JobHandle, JobStatus};
use crate::poll::token::PollToken;

/// Default attempt budget before a session reports exhaustion
const DEFAULT_MAX_ATTEMPTS: u32 = 30;
/// Default delay between attempts
const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);

/// Attempt budget and pacing for one poll session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
        }
    }
}

/// How a poll session ended
///
/// Exhaustion and supersession are ordinary outcomes, not errors; the
/// caller decides whether either deserves a retry or a message.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Readiness was reached; carries the final published detail
    Ready(JobHandle),
    /// The attempt budget ran out before readiness
    Exhausted,
    /// A newer session took over the slot
    Superseded,
}

/// One bounded polling run against a single job.
///
/// The session owns a generation token from its slot; the moment a newer
/// token is issued the session stands down without publishing anything
/// further. In-flight requests are never aborted, their results are
/// discarded instead.
#[derive(Debug)]
pub struct PollSession {
    job_id: String,
    token: PollToken,
    config: PollConfig,
}

impl PollSession {
    pub fn new(job_id: impl Into<String>, token: PollToken) -> Self {
        Self::with_config(job_id, token, PollConfig::default())
    }

    pub fn with_config(job_id: impl Into<String>, token: PollToken, config: PollConfig) -> Self {
        Self {
            job_id: job_id.into(),
            token,
            config,
        }
    }

    /// Run the attempt loop to completion.
    ///
    /// Every successfully fetched detail is passed to `publish` before
    /// readiness is evaluated, so intermediate progress reaches the caller.
    /// A fetch error counts as a used attempt with no update. A `failed`
    /// status is treated as ready regardless of what `is_ready` says.
    pub async fn run<R, P>(self, api: &dyn JobApi, mut is_ready: R, mut publish: P) -> PollOutcome
    where
        R: FnMut(&JobHandle) -> bool,
        P: FnMut(&JobHandle),
    {
        for attempt in 1..=self.config.max_attempts {
            if !self.token.is_current() {
                debug!(job_id = %self.job_id, attempt, "poll superseded before attempt");
                return PollOutcome::Superseded;
            }

            match api.fetch_job(&self.job_id).await {
                Ok(detail) => {
                    // The slot may have moved on while the fetch was in flight
                    if !self.token.is_current() {
                        debug!(job_id = %self.job_id, attempt, "poll superseded during fetch");
                        return PollOutcome::Superseded;
                    }

                    publish(&detail);

                    if detail.status == JobStatus::Failed || is_ready(&detail) {
                        debug!(job_id = %self.job_id, attempt, status = ?detail.status, "poll ready");
                        return PollOutcome::Ready(detail);
                    }
                }
                Err(error) => {
                    debug!(job_id = %self.job_id, attempt, error = %error, "poll fetch failed");
                }
            }

            if attempt < self.config.max_attempts {
                tokio::time::sleep(self.config.interval).await;
            }
        }

        debug!(job_id = %self.job_id, attempts = self.config.max_attempts, "poll exhausted");
        PollOutcome::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::api::MockJobApi;
    use crate::domain::{JobKind, JobRequest};
    use crate::error::Result;
    use crate::poll::token::PollSlot;

    fn fast_config(max_attempts: u32) -> PollConfig {
        PollConfig {
            max_attempts,
            interval: Duration::from_millis(1),
        }
    }

    fn detail(id: &str, status: JobStatus) -> JobHandle {
        JobHandle::new(id, Some(JobKind::Training), status)
    }

    /// Delegates to the scripted api, but a rival claims the slot while
    /// each fetch is still in flight.
    struct MidFetchRival {
        inner: MockJobApi,
        slot: PollSlot,
    }

    #[async_trait]
    impl JobApi for MidFetchRival {
        async fn create_job(&self, request: &JobRequest) -> Result<JobHandle> {
            self.inner.create_job(request).await
        }

        async fn fetch_job(&self, job_id: &str) -> Result<JobHandle> {
            let detail = self.inner.fetch_job(job_id).await;
            self.slot.issue();
            detail
        }

        async fn cancel_job(&self, job_id: &str) -> Result<JobHandle> {
            self.inner.cancel_job(job_id).await
        }
    }

    #[tokio::test]
    async fn test_polls_until_terminal_and_publishes_progress() {
        let api = MockJobApi::new();
        api.script_job(
            "job-1",
            vec![
                detail("job-1", JobStatus::Queued),
                detail("job-1", JobStatus::Running),
                detail("job-1", JobStatus::Success),
            ],
        );
        let slot = PollSlot::new();
        let session = PollSession::with_config("job-1", slot.issue(), fast_config(10));

        let mut published = Vec::new();
        let outcome = session
            .run(&api, |d| d.is_terminal(), |d| published.push(d.status))
            .await;

        assert_eq!(
            published,
            vec![JobStatus::Queued, JobStatus::Running, JobStatus::Success]
        );
        match outcome {
            PollOutcome::Ready(final_detail) => assert_eq!(final_detail.status, JobStatus::Success),
            other => panic!("expected Ready, got {:?}", other),
        }
        assert_eq!(api.fetch_calls(), 3);
    }

    #[tokio::test]
    async fn test_failed_status_is_always_ready() {
        let api = MockJobApi::new();
        api.script_job("job-1", vec![detail("job-1", JobStatus::Failed)]);
        let slot = PollSlot::new();
        let session = PollSession::with_config("job-1", slot.issue(), fast_config(10));

        // Readiness predicate that never fires on its own
        let outcome = session.run(&api, |_| false, |_| {}).await;

        match outcome {
            PollOutcome::Ready(final_detail) => assert_eq!(final_detail.status, JobStatus::Failed),
            other => panic!("expected Ready, got {:?}", other),
        }
        assert_eq!(api.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_errors_consume_attempts_without_publishing() {
        let api = MockJobApi::new();
        api.script_job("job-1", vec![detail("job-1", JobStatus::Success)]);
        api.fail_next_fetches(2);
        let slot = PollSlot::new();
        let session = PollSession::with_config("job-1", slot.issue(), fast_config(10));

        let mut publishes = 0;
        let outcome = session.run(&api, |d| d.is_terminal(), |_| publishes += 1).await;

        assert!(matches!(outcome, PollOutcome::Ready(_)));
        assert_eq!(publishes, 1);
        assert_eq!(api.fetch_calls(), 3);
    }

    #[tokio::test]
    async fn test_exhausts_after_exact_attempt_budget() {
        let api = MockJobApi::new();
        api.script_job("job-1", vec![detail("job-1", JobStatus::Running)]);
        let slot = PollSlot::new();
        let session = PollSession::with_config("job-1", slot.issue(), fast_config(30));

        let outcome = session.run(&api, |d| d.is_terminal(), |_| {}).await;

        assert_eq!(outcome, PollOutcome::Exhausted);
        assert_eq!(api.fetch_calls(), 30);
    }

    #[tokio::test]
    async fn test_superseded_before_first_attempt() {
        let api = MockJobApi::new();
        api.script_job("job-1", vec![detail("job-1", JobStatus::Success)]);
        let slot = PollSlot::new();
        let token = slot.issue();
        slot.issue();
        let session = PollSession::with_config("job-1", token, fast_config(10));

        let mut publishes = 0;
        let outcome = session.run(&api, |d| d.is_terminal(), |_| publishes += 1).await;

        assert_eq!(outcome, PollOutcome::Superseded);
        assert_eq!(publishes, 0);
        assert_eq!(api.fetch_calls(), 0);
    }

    #[tokio::test]
    async fn test_no_publish_after_supersession_mid_run() {
        let api = MockJobApi::new();
        api.script_job("job-1", vec![detail("job-1", JobStatus::Running)]);
        let slot = PollSlot::new();
        let session = PollSession::with_config("job-1", slot.issue(), fast_config(10));

        let mut publishes = 0;
        let outcome = session
            .run(
                &api,
                |d| d.is_terminal(),
                |_| {
                    publishes += 1;
                    // A rival session claims the slot right after the first update
                    if publishes == 1 {
                        slot.issue();
                    }
                },
            )
            .await;

        assert_eq!(outcome, PollOutcome::Superseded);
        assert_eq!(publishes, 1);
    }

    #[tokio::test]
    async fn test_superseded_while_fetch_in_flight_discards_detail() {
        let slot = PollSlot::new();
        let api = MidFetchRival {
            inner: MockJobApi::new(),
            slot: slot.clone(),
        };
        api.inner
            .script_job("job-1", vec![detail("job-1", JobStatus::Success)]);
        let session = PollSession::with_config("job-1", slot.issue(), fast_config(10));

        let mut publishes = 0;
        let outcome = session.run(&api, |d| d.is_terminal(), |_| publishes += 1).await;

        // The detail arrived after the slot moved on, so it never reaches
        // the caller even though the fetch itself succeeded
        assert_eq!(outcome, PollOutcome::Superseded);
        assert_eq!(publishes, 0);
        assert_eq!(api.inner.fetch_calls(), 1);
    }

    #[test]
    fn test_default_config() {
        let config = PollConfig::default();

        assert_eq!(config.max_attempts, 30);
        assert_eq!(config.interval, Duration::from_millis(2000));
    }
}
