//! Numeric range expansion for hyperparameter sweeps
//!
//! Expansion iterates in a scaled integer domain instead of repeatedly
//! adding a float step, so a range like 0.03..0.07 by 0.005 lands exactly
//! on 0.07 instead of drifting past it.

use thiserror::Error;

/// Hard cap on the number of values one sweep may produce
pub const MAX_SWEEP_VALUES: usize = 50;

/// Largest magnitude a scaled bound may take and still convert exactly
const MAX_SCALED_MAGNITUDE: f64 = 9_007_199_254_740_992.0;

/// One-parameter sweep over a numeric range
///
/// Recomputed from the current form inputs on every use; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSpec {
    /// Parameter key the sweep varies
    pub param_key: String,
    /// Range start (inclusive)
    pub start: f64,
    /// Range end
    pub end: f64,
    /// Step between values, must be positive
    pub step: f64,
    /// Whether the end value itself is part of the range
    pub include_end: bool,
}

impl SweepSpec {
    pub fn new(param_key: impl Into<String>, start: f64, end: f64, step: f64, include_end: bool) -> Self {
        Self {
            param_key: param_key.into(),
            start,
            end,
            step,
            include_end,
        }
    }
}

/// Why a sweep could not be expanded
///
/// Rendered messages are the exact strings the dashboard shows next to the
/// sweep form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SweepError {
    /// Bounds are not finite, not exactly scalable, or produce nothing
    #[error("range error")]
    Range,

    /// Step is zero or negative
    #[error("step error")]
    Step,

    /// Start lies beyond end
    #[error("range order error")]
    RangeOrder,

    /// Expansion would exceed the value cap
    #[error("too many values")]
    TooManyValues,
}

/// Outcome of expanding a sweep
///
/// `error` is set exclusive of `values` being non-empty, never both.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    /// Strictly increasing, duplicate-free values
    pub values: Vec<f64>,
    /// Digits after the decimal point in the step, used for display rounding
    pub decimals: u32,
    /// Why expansion failed, if it did
    pub error: Option<SweepError>,
}

impl SweepResult {
    fn failure(decimals: u32, error: SweepError) -> Self {
        Self {
            values: Vec::new(),
            decimals,
            error: Some(error),
        }
    }
}

/// Expand a sweep spec into its discrete value sequence.
///
/// Pure and idempotent: identical input always yields identical output,
/// including the error state.
pub fn expand(spec: &SweepSpec) -> SweepResult {
    if !spec.start.is_finite() || !spec.end.is_finite() || !spec.step.is_finite() {
        return SweepResult::failure(0, SweepError::Range);
    }
    if spec.step <= 0.0 {
        return SweepResult::failure(0, SweepError::Step);
    }
    if spec.start > spec.end {
        return SweepResult::failure(0, SweepError::RangeOrder);
    }

    // Decimals come from the step's decimal string, not its binary structure.
    let decimals = fraction_digits(spec.step);
    let scale = 10f64.powi(decimals as i32);

    let (Some(start), Some(end), Some(step)) = (
        to_scaled(spec.start, scale),
        to_scaled(spec.end, scale),
        to_scaled(spec.step, scale),
    ) else {
        return SweepResult::failure(decimals, SweepError::Range);
    };

    let stop = if spec.include_end { end } else { end - 1 };

    let mut values: Vec<f64> = Vec::new();
    let mut cursor = start;
    while cursor <= stop {
        let value = round_to(cursor as f64 / scale, decimals);
        if values.last() != Some(&value) {
            if values.len() == MAX_SWEEP_VALUES {
                return SweepResult::failure(decimals, SweepError::TooManyValues);
            }
            values.push(value);
        }
        cursor += step;
    }

    if values.is_empty() {
        return SweepResult::failure(decimals, SweepError::Range);
    }

    SweepResult {
        values,
        decimals,
        error: None,
    }
}

/// Count digits after the decimal point in the value's shortest decimal form
fn fraction_digits(value: f64) -> u32 {
    let text = format!("{}", value);
    match text.find('.') {
        Some(dot) => (text.len() - dot - 1) as u32,
        None => 0,
    }
}

/// Map a bound into the scaled integer domain, rejecting values too large
/// to represent exactly
fn to_scaled(value: f64, scale: f64) -> Option<i64> {
    let scaled = value * scale;
    if !scaled.is_finite() || scaled.abs() > MAX_SCALED_MAGNITUDE {
        return None;
    }
    Some(scaled.round() as i64)
}

/// Round to a fixed number of decimal digits
fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
