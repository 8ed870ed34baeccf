//! Remote job records as the backend reports them
//!
//! JobHandle is a read-only cached copy of backend job state; the client
//! never mutates it in place, it replaces the whole copy on each fetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::metrics::resolve_metric;

/// The job families the dashboard manages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// One-off portfolio decision snapshot
    DecisionSnapshot,
    /// ML model training run
    Training,
    /// Strategy backtest
    Backtest,
    /// Scheduled automation run
    Automation,
}

/// Status of a backend job
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Accepted but not started
    Queued,
    /// Currently executing
    Running,
    /// Completed successfully
    Success,
    /// Execution failed
    Failed,
    /// Cancellation requested, not yet confirmed
    CancelRequested,
    /// Execution was cancelled
    Cancelled,
}

impl JobStatus {
    /// Check if this status represents a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Cancelled)
    }

    /// Check if this status represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Check if this status represents a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled)
    }
}

/// Cached copy of a backend job's detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobHandle {
    /// Backend-assigned identifier
    pub id: String,

    /// Which job family this is, when the backend reports it
    #[serde(default)]
    pub kind: Option<JobKind>,

    /// Current status of the job
    pub status: JobStatus,

    /// Opaque nested metrics payload, absent until the backend produces one
    #[serde(default)]
    pub metrics: Option<Value>,

    /// Completion fraction in [0, 1] for long runs
    #[serde(default)]
    pub progress: Option<f64>,

    /// When the backend created this job
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl JobHandle {
    /// Create a handle with no metrics or progress yet
    pub fn new(id: impl Into<String>, kind: Option<JobKind>, status: JobStatus) -> Self {
        Self {
            id: id.into(),
            kind,
            status,
            metrics: None,
            progress: None,
            created_at: None,
        }
    }

    /// Attach a metrics payload
    pub fn with_metrics(mut self, metrics: Value) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Attach a progress fraction
    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Check if the job has reached a terminal status
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Resolve a named metric from the cached metrics payload
    ///
    /// Tries the key directly, then its camelCase variant, then the
    /// walk-forward windowed average. Absent metrics resolve to None.
    pub fn metric(&self, key: &str) -> Option<f64> {
        self.metrics.as_ref().and_then(|m| resolve_metric(m, key))
    }
}

/// Body of a job-creation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    /// Which job family to create
    pub kind: JobKind,

    /// Human-readable label shown in job listings
    pub name: String,

    /// Backend-interpreted parameters (hyperparameters, universe, dates)
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl JobRequest {
    /// Create a request with no parameters
    pub fn new(kind: JobKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            params: Map::new(),
        }
    }

    /// Set one parameter, replacing any previous value for the key
    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}
