//! Input routing primitives: visibility gating, the single-owner capture
//! arbiter for global wheel/keyboard input, and throttled scene pagination.

pub mod capture;
pub mod pager;
pub mod visibility;

pub use capture::{CaptureOutcome, CaptureRegistry};
pub use pager::{PagerStep, ScenePager};
pub use visibility::{VisibilityChange, VisibilityGate};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Enter,
    Space,
    Other,
}

impl Key {
    /// Scene navigation direction bound to this key, if any.
    #[must_use]
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::ArrowDown | Self::PageDown => Some(Direction::Next),
            Self::ArrowUp | Self::PageUp => Some(Direction::Previous),
            _ => None,
        }
    }

    /// Keys that activate a focused control like a click.
    #[must_use]
    pub fn activates(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// Positive wheel deltas scroll forward. A zero delta carries no direction.
    #[must_use]
    pub fn from_wheel(delta_y: f64) -> Option<Self> {
        if !delta_y.is_finite() || delta_y == 0.0 {
            return None;
        }
        Some(if delta_y > 0.0 {
            Self::Next
        } else {
            Self::Previous
        })
    }
}

/// Global input forwarded by the host while a page holds capture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Wheel { delta_y: f64 },
    Key(Key),
}

impl InputEvent {
    #[must_use]
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::Wheel { delta_y } => Direction::from_wheel(delta_y),
            Self::Key(key) => key.direction(),
        }
    }
}

/// Whether the host should suppress the native default action for an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputDisposition {
    /// The page handled the input; prevent native scrolling.
    Consumed,
    /// Let the input fall through to native scrolling.
    PassThrough,
}
