use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::scheduler::{EffectFn, Flow};
use crate::core::NodeId;

/// Linear integer count-up rendered once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountUp {
    pub start: i64,
    pub end: i64,
    pub duration: Duration,
    /// Render with `,` thousands separators.
    pub grouped: bool,
}

impl CountUp {
    #[must_use]
    pub fn new(start: i64, end: i64, duration: Duration) -> Self {
        Self {
            start,
            end,
            duration,
            grouped: true,
        }
    }

    #[must_use]
    pub fn with_grouping(mut self, grouped: bool) -> Self {
        self.grouped = grouped;
        self
    }

    /// Normalized progress in `[0, 1]`; a zero duration is complete immediately.
    #[must_use]
    pub fn progress(self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Value shown `elapsed` after the start.
    ///
    /// Intermediate values are floored; the final value is exactly `end`.
    #[must_use]
    pub fn value_at(self, elapsed: Duration) -> i64 {
        let progress = self.progress(elapsed);
        if progress >= 1.0 {
            return self.end;
        }
        let span = (self.end - self.start) as f64;
        (progress * span + self.start as f64).floor() as i64
    }

    #[must_use]
    pub fn is_finished(self, elapsed: Duration) -> bool {
        self.progress(elapsed) >= 1.0
    }

    #[must_use]
    pub fn format(self, value: i64) -> String {
        if self.grouped {
            group_thousands(value)
        } else {
            value.to_string()
        }
    }

    /// Frame effect writing the current value into `node`'s text.
    pub(crate) fn into_effect(self, node: NodeId) -> EffectFn {
        Box::new(move |sandbox, tick| {
            let value = self.value_at(tick.elapsed);
            sandbox.set_text(node, self.format(value));
            if self.is_finished(tick.elapsed) {
                Flow::Done
            } else {
                Flow::NextFrame
            }
        })
    }
}

/// Formats an integer with `,` every three digits.
#[must_use]
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
