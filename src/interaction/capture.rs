use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::PageKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureOutcome {
    /// The page now owns global input capture.
    Acquired,
    /// The page already owned capture.
    AlreadyOwner,
    /// Another page owns capture; this page waits in line.
    Queued,
}

/// Process-wide arbiter for the wheel/keyboard capture slot.
///
/// At most one page owns the slot. Pages that ask while it is held wait in
/// FIFO order and receive ownership when the holder releases it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRegistry {
    owner: Option<PageKey>,
    waiting: VecDeque<PageKey>,
}

impl CaptureRegistry {
    #[must_use]
    pub fn owner(&self) -> Option<PageKey> {
        self.owner
    }

    #[must_use]
    pub fn is_owner(&self, page: PageKey) -> bool {
        self.owner == Some(page)
    }

    #[must_use]
    pub fn waiting(&self) -> Vec<PageKey> {
        self.waiting.iter().copied().collect()
    }

    pub fn acquire(&mut self, page: PageKey) -> CaptureOutcome {
        match self.owner {
            Some(owner) if owner == page => CaptureOutcome::AlreadyOwner,
            Some(owner) => {
                if !self.waiting.contains(&page) {
                    self.waiting.push_back(page);
                }
                debug!(page = page.0, owner = owner.0, "input capture queued");
                CaptureOutcome::Queued
            }
            None => {
                self.owner = Some(page);
                debug!(page = page.0, "input capture acquired");
                CaptureOutcome::Acquired
            }
        }
    }

    /// Releases `page`'s claim. Returns the page promoted to owner, if any.
    ///
    /// Releasing a queued page just removes it from the line; releasing a page
    /// that holds nothing is a no-op.
    pub fn release(&mut self, page: PageKey) -> Option<PageKey> {
        if self.owner != Some(page) {
            self.waiting.retain(|queued| *queued != page);
            return None;
        }
        self.owner = self.waiting.pop_front();
        debug!(
            page = page.0,
            next = self.owner.map(|next| next.0),
            "input capture released"
        );
        self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_waits_until_release() {
        let mut registry = CaptureRegistry::default();
        assert_eq!(registry.acquire(PageKey(1)), CaptureOutcome::Acquired);
        assert_eq!(registry.acquire(PageKey(2)), CaptureOutcome::Queued);
        assert_eq!(registry.acquire(PageKey(1)), CaptureOutcome::AlreadyOwner);
        assert_eq!(registry.owner(), Some(PageKey(1)));

        assert_eq!(registry.release(PageKey(1)), Some(PageKey(2)));
        assert!(registry.is_owner(PageKey(2)));
        assert!(registry.waiting().is_empty());
    }

    #[test]
    fn releasing_queued_page_leaves_owner_alone() {
        let mut registry = CaptureRegistry::default();
        registry.acquire(PageKey(1));
        registry.acquire(PageKey(2));
        assert_eq!(registry.release(PageKey(2)), None);
        assert_eq!(registry.owner(), Some(PageKey(1)));
        assert_eq!(registry.release(PageKey(1)), None);
        assert_eq!(registry.owner(), None);
    }
}
