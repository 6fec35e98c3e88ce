//! Literal data transforms applied before a chart or DOM bar set is built.
//!
//! Inputs are borrowed; nothing here mutates a source dataset.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: f64,
}

impl LabeledValue {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Proportional size of one bar relative to the largest value in its set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarExtent {
    pub label: String,
    pub value: f64,
    /// `value / max * 100`, in `[0, 100]` for non-negative data.
    pub percent: f64,
}

/// Largest finite value, or `None` for an empty or all-NaN slice.
#[must_use]
pub fn max_finite(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .reduce(f64::max)
}

/// Scales `values` so the maximum maps to `100.0`.
///
/// A non-positive maximum yields all zeros, so empty charts stay flat instead
/// of dividing by zero.
#[must_use]
pub fn scale_to_max(values: &[f64]) -> Vec<f64> {
    let Some(max) = max_finite(values).filter(|max| *max > 0.0) else {
        return vec![0.0; values.len()];
    };
    values
        .iter()
        .map(|value| {
            if value.is_finite() {
                value / max * 100.0
            } else {
                0.0
            }
        })
        .collect()
}

/// `part / whole` as a percentage; `None` when `whole` is zero or either side is not finite.
#[must_use]
pub fn ratio_percent(part: f64, whole: f64) -> Option<f64> {
    if !part.is_finite() || !whole.is_finite() || whole == 0.0 {
        return None;
    }
    Some(part / whole * 100.0)
}

#[must_use]
pub fn bar_extents(data: &[LabeledValue]) -> Vec<BarExtent> {
    let values: Vec<f64> = data.iter().map(|entry| entry.value).collect();
    scale_to_max(&values)
        .into_iter()
        .zip(data)
        .map(|(percent, entry)| BarExtent {
            label: entry.label.clone(),
            value: entry.value,
            percent,
        })
        .collect()
}

/// CSS percentage literal with up to two decimals, trailing zeros trimmed.
#[must_use]
pub fn css_percent(percent: f64) -> String {
    let rounded = format!("{percent:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}%")
}
