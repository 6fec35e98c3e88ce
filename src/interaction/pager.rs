use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::interaction::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PagerStep {
    Moved { from: usize, to: usize },
    /// A transition is still cooling down; the input is swallowed.
    Throttled,
    /// Already at the first (previous) or last (next) scene; native scrolling
    /// should take over.
    FallThrough,
    /// Requested scene is the current one or out of range.
    Ignored,
}

/// Sub-scene index of a paginated page with a post-transition cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenePager {
    len: usize,
    index: usize,
    cooldown: Duration,
    locked_until: Option<Duration>,
}

impl ScenePager {
    #[must_use]
    pub fn new(len: usize, cooldown: Duration) -> Self {
        Self {
            len,
            index: 0,
            cooldown,
            locked_until: None,
        }
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.index
    }

    #[must_use]
    pub fn is_throttled(self, now: Duration) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    /// Moves one scene in `direction` unless throttled or at the boundary.
    pub fn step(&mut self, direction: Direction, now: Duration) -> PagerStep {
        if self.is_throttled(now) {
            trace!(index = self.index, "scene input throttled");
            return PagerStep::Throttled;
        }
        let target = match direction {
            Direction::Previous if self.index == 0 => return PagerStep::FallThrough,
            Direction::Next if self.index + 1 >= self.len => return PagerStep::FallThrough,
            Direction::Previous => self.index - 1,
            Direction::Next => self.index + 1,
        };
        self.jump(target, now)
    }

    /// Jumps straight to `index` (pagination dot click), obeying the cooldown.
    pub fn go_to(&mut self, index: usize, now: Duration) -> PagerStep {
        if index >= self.len || index == self.index {
            return PagerStep::Ignored;
        }
        if self.is_throttled(now) {
            return PagerStep::Throttled;
        }
        self.jump(index, now)
    }

    fn jump(&mut self, to: usize, now: Duration) -> PagerStep {
        let from = self.index;
        self.index = to;
        self.locked_until = Some(now.saturating_add(self.cooldown));
        PagerStep::Moved { from, to }
    }

    /// Returns to the first scene without starting a cooldown.
    pub fn reset(&mut self) {
        self.index = 0;
        self.locked_until = None;
    }
}
