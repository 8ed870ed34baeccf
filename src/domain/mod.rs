//! Domain types for alphadesk
//!
//! This module contains the core job types shared across the crate:
//! - JobKind: the job families the dashboard manages
//! - JobStatus: backend job lifecycle states
//! - JobHandle: read-only cached copy of a backend job's detail
//! - JobRequest: body of a job-creation call

pub mod job;

pub use job::{JobHandle, JobKind, JobRequest, JobStatus};
