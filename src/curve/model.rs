//! Normalized training-curve data extracted from job metrics
//!
//! Backends report curves in two shapes: an explicit `curve` object (top
//! level or under `walk_forward`) with train/valid series, or an epoch
//! `history` array from which a validation-loss series can be rebuilt.

use serde_json::Value;

use crate::metrics::extract_scalar;

/// Train/valid series pair ready for plotting
///
/// At least one of `train`/`valid` is non-empty for any model returned by
/// [`build_curve`].
#[derive(Debug, Clone, PartialEq)]
pub struct CurveModel {
    /// Name of the plotted metric, empty when the backend omitted it
    pub metric: String,
    /// Iteration labels aligned with the series, possibly empty
    pub iterations: Vec<f64>,
    pub train: Vec<f64>,
    pub valid: Vec<f64>,
}

impl CurveModel {
    /// Length of the longer series
    pub fn series_len(&self) -> usize {
        self.train.len().max(self.valid.len())
    }
}

/// Build a curve model from raw job metrics.
///
/// An explicit curve object wins over the history fallback; a curve object
/// whose series are both empty falls through to history. Returns `None`
/// when the metrics hold nothing plottable.
pub fn build_curve(metrics: &Value) -> Option<CurveModel> {
    if let Some(curve) = metrics
        .get("curve")
        .or_else(|| metrics.get("walk_forward").and_then(|wf| wf.get("curve")))
    {
        let train = numeric_series(curve.get("train"));
        let valid = numeric_series(curve.get("valid"));
        if !train.is_empty() || !valid.is_empty() {
            let metric = curve
                .get("metric")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Some(CurveModel {
                metric,
                iterations: numeric_series(curve.get("iterations")),
                train,
                valid,
            });
        }
    }

    let history = metrics.get("history").and_then(Value::as_array)?;
    let mut iterations = Vec::new();
    let mut valid = Vec::new();
    for (index, record) in history.iter().enumerate() {
        if let Some(loss) = record.get("valid_loss").and_then(extract_scalar) {
            let epoch = record
                .get("epoch")
                .and_then(extract_scalar)
                .unwrap_or((index + 1) as f64);
            iterations.push(epoch);
            valid.push(loss);
        }
    }
    if valid.is_empty() {
        return None;
    }

    Some(CurveModel {
        metric: "valid_loss".to_string(),
        iterations,
        train: Vec::new(),
        valid,
    })
}

/// Convert a JSON array into the scalars it contains, skipping anything
/// non-numeric
fn numeric_series(value: Option<&Value>) -> Vec<f64> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(extract_scalar).collect())
        .unwrap_or_default()
}
