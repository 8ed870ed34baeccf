//! Best-effort scalar extraction from nested job metrics
//!
//! Metrics payloads vary by job type and backend version: single-run jobs
//! report flat snake_case fields, walk-forward jobs nest per-window results,
//! and older payloads use camelCase. Extraction is a small ordered list of
//! strategies tried in sequence rather than per-field branching.

use serde_json::Value;

/// Pull a scalar out of an arbitrarily shaped metric value.
///
/// Finite numbers are returned as-is, numeric strings are parsed, and
/// objects are scanned depth-first for the first scalar found in the map's
/// own key order. Nulls, booleans, and arrays yield None.
pub fn extract_scalar(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        Value::Object(map) => map.values().find_map(extract_scalar),
        _ => None,
    }
}

/// Average a metric across walk-forward windows.
///
/// Looks for the window list at `walk_forward.windows` or `walkForward.windows`
/// and returns the arithmetic mean of the windows where `key` extracts to a
/// scalar. Absent or empty windows, or no numeric entries, yield None.
pub fn extract_windowed(metrics: &Value, key: &str) -> Option<f64> {
    let windows = metrics
        .get("walk_forward")
        .or_else(|| metrics.get("walkForward"))
        .and_then(|wf| wf.get("windows"))
        .and_then(Value::as_array)?;

    let values: Vec<f64> = windows
        .iter()
        .filter_map(|window| window.get(key).and_then(extract_scalar))
        .collect();

    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Resolve a named metric from a job's metrics payload.
///
/// Tries the direct field, then its camelCase variant, then the windowed
/// average; returns the first hit, else None.
pub fn resolve_metric(metrics: &Value, key: &str) -> Option<f64> {
    if let Some(value) = metrics.get(key).and_then(extract_scalar) {
        return Some(value);
    }

    let camel = snake_to_camel(key);
    if camel != key
        && let Some(value) = metrics.get(&camel).and_then(extract_scalar)
    {
        return Some(value);
    }

    extract_windowed(metrics, key)
}

/// Convert a snake_case key to its camelCase variant
fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
