//! alphadesk - job orchestration and metrics charting core for a quant research dashboard
//!
//! The crate owns everything between the dashboard's forms and its plots:
//! hyperparameter sweep expansion and submission, bounded job polling with
//! supersession, metric extraction from heterogeneous backend payloads, and
//! training-curve plot geometry. Rendering and the backend itself live
//! elsewhere.

pub mod api;
pub mod curve;
pub mod domain;
pub mod error;
pub mod id;
pub mod metrics;
pub mod poll;
pub mod sweep;

pub use error::{DeskError, Result};
