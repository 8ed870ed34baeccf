//! Training-curve extraction and plot geometry

pub mod layout;
pub mod model;

pub use layout::{BestPoint, CurveLayout, Tick, TickSet, Viewport, layout};
pub use model::{CurveModel, build_curve};
