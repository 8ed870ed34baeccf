//! Fan-out submission of expanded sweeps

use serde_json::json;
use tracing::{debug, info};

use crate::api::JobApi;
use crate::domain::{JobHandle, JobRequest};
use crate::error::{DeskError, Result};
use crate::id::generate_sweep_id;
use crate::sweep::expand::{SweepSpec, expand};

/// Record of one submitted sweep batch
///
/// `sweep_id` exists for logs and display only; the backend never sees it
/// and jobs are correlated purely by their own ids.
#[derive(Debug, Clone)]
pub struct SweepSubmission {
    pub sweep_id: String,
    pub param_key: String,
    pub values: Vec<f64>,
    pub jobs: Vec<JobHandle>,
}

/// Expand a sweep and submit one job per value.
///
/// Jobs are created sequentially in value order, each from a copy of the
/// base request with the swept parameter overridden. The first creation
/// failure aborts the batch; jobs already created are not rolled back.
pub async fn submit_sweep(api: &dyn JobApi, base: &JobRequest, spec: &SweepSpec) -> Result<SweepSubmission> {
    if spec.param_key.trim().is_empty() {
        return Err(DeskError::Request("sweep parameter key must not be empty".to_string()));
    }

    let expansion = expand(spec);
    if let Some(error) = expansion.error {
        return Err(error.into());
    }

    let sweep_id = generate_sweep_id();
    info!(
        sweep_id = %sweep_id,
        param_key = %spec.param_key,
        count = expansion.values.len(),
        "submitting sweep"
    );

    let mut jobs = Vec::with_capacity(expansion.values.len());
    for &value in &expansion.values {
        let request = base.clone().with_param(spec.param_key.as_str(), json!(value));
        let job = api.create_job(&request).await?;
        debug!(sweep_id = %sweep_id, job_id = %job.id, value, "sweep job created");
        jobs.push(job);
    }

    Ok(SweepSubmission {
        sweep_id,
        param_key: spec.param_key.clone(),
        values: expansion.values,
        jobs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockJobApi;
    use crate::domain::JobKind;
    use crate::sweep::expand::SweepError;

    fn base_request() -> JobRequest {
        JobRequest::new(JobKind::Training, "lr sweep")
    }

    #[tokio::test]
    async fn test_submit_creates_one_job_per_value() {
        let api = MockJobApi::new();
        let spec = SweepSpec::new("learning_rate", 0.03, 0.07, 0.005, true);

        let submission = submit_sweep(&api, &base_request(), &spec).await.unwrap();

        assert_eq!(submission.values.len(), 9);
        assert_eq!(submission.jobs.len(), 9);
        assert_eq!(submission.param_key, "learning_rate");

        let created = api.created_requests();
        assert_eq!(created.len(), 9);
        for (request, value) in created.iter().zip(&submission.values) {
            assert_eq!(request.params.get("learning_rate"), Some(&json!(value)));
            assert_eq!(request.name, "lr sweep");
        }
    }

    #[tokio::test]
    async fn test_submit_preserves_base_params() {
        let api = MockJobApi::new();
        let base = base_request().with_param("epochs", json!(20));
        let spec = SweepSpec::new("learning_rate", 0.1, 0.2, 0.1, true);

        submit_sweep(&api, &base, &spec).await.unwrap();

        for request in api.created_requests() {
            assert_eq!(request.params.get("epochs"), Some(&json!(20)));
            assert!(request.params.contains_key("learning_rate"));
        }
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_param_key() {
        let api = MockJobApi::new();
        let spec = SweepSpec::new("  ", 0.0, 1.0, 0.5, true);

        let error = submit_sweep(&api, &base_request(), &spec).await.unwrap_err();

        assert!(matches!(error, DeskError::Request(_)));
        assert!(api.created_requests().is_empty());
    }

    #[tokio::test]
    async fn test_submit_propagates_expansion_errors() {
        let api = MockJobApi::new();
        let spec = SweepSpec::new("learning_rate", 5.0, 1.0, 0.5, true);

        let error = submit_sweep(&api, &base_request(), &spec).await.unwrap_err();

        assert!(matches!(error, DeskError::Sweep(SweepError::RangeOrder)));
        assert!(api.created_requests().is_empty());
    }

    #[tokio::test]
    async fn test_submit_aborts_on_first_creation_failure() {
        let api = MockJobApi::new();
        api.fail_create_at(2);
        let spec = SweepSpec::new("learning_rate", 0.1, 0.5, 0.1, true);

        let error = submit_sweep(&api, &base_request(), &spec).await.unwrap_err();

        assert!(matches!(error, DeskError::Api { status: 500, .. }));
        // The two jobs before the failure stay created
        assert_eq!(api.created_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_submission_ids_are_unique() {
        let api = MockJobApi::new();
        let spec = SweepSpec::new("learning_rate", 0.1, 0.2, 0.1, true);

        let first = submit_sweep(&api, &base_request(), &spec).await.unwrap();
        let second = submit_sweep(&api, &base_request(), &spec).await.unwrap();

        assert_ne!(first.sweep_id, second.sweep_id);
        assert!(first.sweep_id.starts_with("sweep-"));
    }
}
