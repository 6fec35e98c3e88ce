use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

/// Vertical placement of an element in document coordinates.
///
/// Pages in a deck stack vertically, so intersection and scroll progress only
/// need the top edge and the height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutRect {
    pub top: f64,
    pub height: f64,
}

impl LayoutRect {
    #[must_use]
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.top.is_finite() && self.height.is_finite() && self.height > 0.0
    }

    /// Fraction of this rect covered by the viewport band `[scroll_y, scroll_y + viewport_height)`.
    ///
    /// Mirrors an intersection observer ratio: `0.0` when disjoint, `1.0` when
    /// fully inside.
    #[must_use]
    pub fn intersection_ratio(self, scroll_y: f64, viewport_height: f64) -> f64 {
        if !self.is_valid() || !scroll_y.is_finite() || viewport_height <= 0.0 {
            return 0.0;
        }
        let visible_top = self.top.max(scroll_y);
        let visible_bottom = self.bottom().min(scroll_y + viewport_height);
        let overlap = (visible_bottom - visible_top).max(0.0);
        (overlap / self.height).clamp(0.0, 1.0)
    }

    /// Scroll progress relative to this section, in viewport heights.
    ///
    /// `0.0` when the section top reaches the viewport top, `1.0` after one
    /// more viewport height of scrolling. Not clamped.
    #[must_use]
    pub fn scroll_progress(self, scroll_y: f64, viewport_height: f64) -> f64 {
        if viewport_height <= 0.0 {
            return 0.0;
        }
        (scroll_y - self.top) / viewport_height
    }
}

/// Registry slot of a page inside a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageKey(pub u32);
