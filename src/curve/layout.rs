//! Plot geometry for training curves
//!
//! Pure pixel-space math: SVG-style path strings, axis ticks, and the
//! best-point marker. No drawing happens here; the render surface consumes
//! the computed geometry as-is.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::curve::model::CurveModel;

/// Major tick count on each vertical axis
const Y_TICK_COUNT: usize = 4;
/// Upper bound on major ticks along the horizontal axis
const X_TICK_MAX: usize = 5;
/// Fraction of the value span padded onto each end of a scale
const RANGE_PAD_FRACTION: f64 = 0.05;

/// Metric names where a smaller value is the better one
static LOWER_IS_BETTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)loss|error|rmse|mse|mae|logloss").expect("metric direction regex must compile")
});

/// Pixel-space drawing area
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Inset between the viewport edge and the plot region on every side
    pub padding: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 320.0,
            padding: 40.0,
        }
    }
}

/// One labelled axis tick at a pixel position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// Major ticks plus the unlabelled minor positions between them
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickSet {
    pub major: Vec<Tick>,
    pub minor: Vec<f64>,
}

/// Highlighted best value on the validation series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestPoint {
    pub index: usize,
    pub value: f64,
    pub x: f64,
    pub y: f64,
}

/// Complete geometry for one curve plot
///
/// The validation series carries its own vertical scale, so `valid_path`
/// and `y_valid_ticks` are computed against the valid-only range while
/// `train_path` and `y_ticks` use the range of both series combined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveLayout {
    pub train_path: String,
    pub valid_path: String,
    pub y_ticks: TickSet,
    pub y_valid_ticks: TickSet,
    pub x_ticks: TickSet,
    pub best_point: Option<BestPoint>,
}

/// Padded value range backing one vertical scale
#[derive(Debug, Clone, Copy)]
struct Scale {
    lo: f64,
    hi: f64,
}

/// Compute the full plot geometry for a curve inside a viewport.
pub fn layout(curve: &CurveModel, viewport: &Viewport) -> CurveLayout {
    let primary = padded_range(curve.train.iter().chain(curve.valid.iter()).copied());
    let valid_scale = padded_range(curve.valid.iter().copied());

    let Some(primary) = primary else {
        return CurveLayout {
            train_path: String::new(),
            valid_path: String::new(),
            y_ticks: TickSet::default(),
            y_valid_ticks: TickSet::default(),
            x_ticks: TickSet::default(),
            best_point: None,
        };
    };

    CurveLayout {
        train_path: series_path(viewport, &curve.train, primary),
        valid_path: valid_scale
            .map(|scale| series_path(viewport, &curve.valid, scale))
            .unwrap_or_default(),
        y_ticks: y_tick_set(viewport, primary),
        y_valid_ticks: valid_scale
            .map(|scale| y_tick_set(viewport, scale))
            .unwrap_or_default(),
        x_ticks: x_tick_set(viewport, curve),
        best_point: valid_scale.and_then(|scale| best_point(viewport, curve, scale)),
    }
}

/// Range of the values padded so no point sits on the plot border.
///
/// A constant series gets a synthetic span around its single value so the
/// scale never degenerates.
fn padded_range(values: impl Iterator<Item = f64>) -> Option<Scale> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut seen = false;
    for value in values {
        seen = true;
        min = min.min(value);
        max = max.max(value);
    }
    if !seen {
        return None;
    }

    if min == max {
        let half = if min == 0.0 { 1.0 } else { min.abs() * 0.5 };
        return Some(Scale {
            lo: min - half,
            hi: min + half,
        });
    }

    let pad = (max - min) * RANGE_PAD_FRACTION;
    Some(Scale {
        lo: min - pad,
        hi: max + pad,
    })
}

/// Horizontal pixel for a series index; a lone point sits at the center
fn x_at(viewport: &Viewport, index: usize, len: usize) -> f64 {
    let t = if len > 1 {
        index as f64 / (len - 1) as f64
    } else {
        0.5
    };
    viewport.padding + t * (viewport.width - 2.0 * viewport.padding)
}

/// Vertical pixel for a value on a scale; larger values sit higher
fn y_at(viewport: &Viewport, value: f64, scale: Scale) -> f64 {
    let t = (scale.hi - value) / (scale.hi - scale.lo);
    viewport.padding + t * (viewport.height - 2.0 * viewport.padding)
}

/// SVG path string for one series, empty when the series is
fn series_path(viewport: &Viewport, series: &[f64], scale: Scale) -> String {
    let mut path = String::new();
    for (index, &value) in series.iter().enumerate() {
        let x = x_at(viewport, index, series.len());
        let y = y_at(viewport, value, scale);
        let command = if index == 0 { "M" } else { " L" };
        path.push_str(&format!("{}{:.2},{:.2}", command, x, y));
    }
    path
}

/// Evenly spaced major ticks over a vertical scale, with minors midway
fn y_tick_set(viewport: &Viewport, scale: Scale) -> TickSet {
    let span = scale.hi - scale.lo;
    let mut major = Vec::with_capacity(Y_TICK_COUNT);
    for step in 0..Y_TICK_COUNT {
        let value = scale.lo + span * step as f64 / (Y_TICK_COUNT - 1) as f64;
        major.push(Tick {
            position: y_at(viewport, value, scale),
            label: format_tick(value),
        });
    }
    let minor = major
        .windows(2)
        .map(|pair| (pair[0].position + pair[1].position) / 2.0)
        .collect();
    TickSet { major, minor }
}

/// Up to five major ticks spread across the series indices
fn x_tick_set(viewport: &Viewport, curve: &CurveModel) -> TickSet {
    let len = curve.series_len();
    if len == 0 {
        return TickSet::default();
    }

    let count = X_TICK_MAX.min(len);
    let mut major = Vec::with_capacity(count);
    for step in 0..count {
        let index = if count > 1 {
            (step as f64 * (len - 1) as f64 / (count - 1) as f64).round() as usize
        } else {
            0
        };
        let label_value = curve
            .iterations
            .get(index)
            .copied()
            .unwrap_or((index + 1) as f64);
        major.push(Tick {
            position: x_at(viewport, index, len),
            label: format_tick(label_value),
        });
    }
    let minor = major
        .windows(2)
        .map(|pair| (pair[0].position + pair[1].position) / 2.0)
        .collect();
    TickSet { major, minor }
}

/// Locate the best validation value, honoring the metric's direction.
///
/// Ties keep the earliest index. Position is computed on the valid-only
/// scale, matching the path the marker sits on.
fn best_point(viewport: &Viewport, curve: &CurveModel, valid_scale: Scale) -> Option<BestPoint> {
    if curve.valid.is_empty() {
        return None;
    }

    let lower_is_better = LOWER_IS_BETTER.is_match(&curve.metric);
    let mut best = 0usize;
    for (index, &value) in curve.valid.iter().enumerate().skip(1) {
        let better = if lower_is_better {
            value < curve.valid[best]
        } else {
            value > curve.valid[best]
        };
        if better {
            best = index;
        }
    }

    Some(BestPoint {
        index: best,
        value: curve.valid[best],
        x: x_at(viewport, best, curve.valid.len()),
        y: y_at(viewport, curve.valid[best], valid_scale),
    })
}

/// Render a tick value with up to four decimals and no trailing zeros
fn format_tick(value: f64) -> String {
    let text = format!("{:.4}", value);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
