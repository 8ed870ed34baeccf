//! Hyperparameter sweep expansion and batch submission

pub mod expand;
pub mod submit;

pub use expand::{MAX_SWEEP_VALUES, SweepError, SweepResult, SweepSpec, expand};
pub use submit::{SweepSubmission, submit_sweep};
