use serde::{Deserialize, Serialize};

use crate::error::{DeckError, DeckResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibilityChange {
    Entered,
    Left,
}

/// Intersection-driven on/off switch for one page.
///
/// Reports a change only when the observed ratio crosses the threshold, the
/// way an intersection observer fires on threshold crossings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibilityGate {
    threshold: f64,
    visible: bool,
    last_ratio: f64,
}

impl VisibilityGate {
    pub fn new(threshold: f64) -> DeckResult<Self> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(DeckError::InvalidConfig(format!(
                "visibility threshold must be finite and in [0, 1], got {threshold}"
            )));
        }
        Ok(Self {
            threshold,
            visible: false,
            last_ratio: 0.0,
        })
    }

    #[must_use]
    pub fn threshold(self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn is_visible(self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn last_ratio(self) -> f64 {
        self.last_ratio
    }

    fn passes(self, ratio: f64) -> bool {
        if self.threshold == 0.0 {
            ratio > 0.0
        } else {
            ratio >= self.threshold
        }
    }

    /// Feeds a new intersection ratio; returns the crossing, if any.
    pub fn observe(&mut self, ratio: f64) -> Option<VisibilityChange> {
        let ratio = if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.last_ratio = ratio;
        let now_visible = self.passes(ratio);
        if now_visible == self.visible {
            return None;
        }
        self.visible = now_visible;
        Some(if now_visible {
            VisibilityChange::Entered
        } else {
            VisibilityChange::Left
        })
    }

    /// Forces the gate closed, returning `Left` if it was open.
    pub fn close(&mut self) -> Option<VisibilityChange> {
        self.observe(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_on_threshold_crossings() {
        let mut gate = VisibilityGate::new(0.5).expect("valid threshold");
        assert_eq!(gate.observe(0.2), None);
        assert_eq!(gate.observe(0.5), Some(VisibilityChange::Entered));
        assert_eq!(gate.observe(0.9), None);
        assert_eq!(gate.observe(0.49), Some(VisibilityChange::Left));
        assert_eq!(gate.observe(0.0), None);
    }

    #[test]
    fn zero_threshold_means_any_overlap() {
        let mut gate = VisibilityGate::new(0.0).expect("valid threshold");
        assert_eq!(gate.observe(0.0), None);
        assert_eq!(gate.observe(0.01), Some(VisibilityChange::Entered));
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        assert!(VisibilityGate::new(1.5).is_err());
        assert!(VisibilityGate::new(f64::NAN).is_err());
    }
}
