use tracing::debug;

use crate::chart::ChartBackend;
use crate::core::{PageKey, Resolution};
use crate::error::{DeckError, DeckResult};
use crate::interaction::VisibilityGate;

use super::deck::{Deck, PageEntry};
use super::page::{PageController, PageEvent, PageStatus};
use super::validation::validate_visibility_threshold;

impl<B: ChartBackend> Deck<B> {
    /// Registers a page controller under its container id.
    ///
    /// Pages registered after [`Deck::boot`] are mounted immediately.
    pub fn register(&mut self, controller: Box<dyn PageController>) -> DeckResult<PageKey> {
        let container_id = controller.container_id().to_owned();
        if container_id.is_empty() {
            return Err(DeckError::InvalidData(
                "page container id must not be empty".to_owned(),
            ));
        }
        if self.page_by_id(&container_id).is_some() {
            return Err(DeckError::DuplicatePage(container_id));
        }
        let options = controller.options();
        let threshold = options
            .visibility_threshold
            .unwrap_or(self.config.visibility_threshold);
        validate_visibility_threshold(threshold)?;
        let gate = VisibilityGate::new(threshold)?;

        let key = PageKey(u32::try_from(self.pages.len()).map_err(|_| {
            DeckError::InvalidData("too many pages registered".to_owned())
        })?);
        self.pages.push(PageEntry {
            key,
            controller,
            options,
            gate,
            container: None,
            status: PageStatus::Registered,
            resize_stale: false,
        });
        debug!(page = key.0, container = %container_id, "page registered");
        if self.booted {
            self.mount_page(key);
        }
        Ok(key)
    }

    /// Document-ready: resolves every page container and mounts what exists.
    pub fn boot(&mut self) {
        self.booted = true;
        let keys: Vec<PageKey> = self.pages.iter().map(|entry| entry.key).collect();
        for key in keys {
            self.mount_page(key);
        }
    }

    pub(super) fn mount_page(&mut self, key: PageKey) {
        let Some(entry) = self.entry_mut(key) else {
            return;
        };
        if entry.status == PageStatus::Unmounted {
            return;
        }
        let container_id = entry.controller.container_id().to_owned();
        match self.document.resolve_container(&container_id) {
            Resolution::Found(node) => {
                if let Some(entry) = self.entry_mut(key) {
                    entry.container = Some(node);
                }
            }
            Resolution::NotFound => {
                if let Some(entry) = self.entry_mut(key) {
                    entry.container = None;
                    entry.status = PageStatus::Dormant;
                }
                debug!(page = key.0, container = %container_id, "container absent, page dormant");
                return;
            }
        }

        match self.with_page(key, |controller, cx| controller.mount(cx)) {
            Some(Ok(())) => {
                if let Some(entry) = self.entry_mut(key) {
                    entry.status = PageStatus::Mounted;
                }
                debug!(page = key.0, container = %container_id, "page mounted");
            }
            Some(Err(missing)) => {
                if let Some(entry) = self.entry_mut(key) {
                    entry.status = PageStatus::Skipped {
                        missing: missing.what.clone(),
                    };
                }
                let bindings = self.bindings.remove_page(key);
                let tasks = self.scheduler.cancel_owner(key);
                self.release_capture(key);
                debug!(
                    page = key.0,
                    container = %container_id,
                    %missing,
                    bindings,
                    tasks,
                    "page skipped"
                );
            }
            None => {}
        }
    }

    /// Re-runs initialization on every page that has not been unmounted.
    pub(super) fn remount_all(&mut self) {
        if self.remounting || !self.booted {
            return;
        }
        self.remounting = true;
        let keys: Vec<PageKey> = self.pages.iter().map(|entry| entry.key).collect();
        for key in keys {
            self.mount_page(key);
        }
        self.remounting = false;
    }

    /// Tears a page down: runs its `teardown`, cancels all of its scheduled
    /// work, drops its bindings and releases input capture.
    ///
    /// Returns `false` for unknown ids and pages that were never mounted.
    pub fn unmount(&mut self, container_id: &str) -> bool {
        let Some(key) = self
            .page_by_id(container_id)
            .filter(|entry| entry.status.is_mounted())
            .map(|entry| entry.key)
        else {
            return false;
        };
        self.with_page(key, |controller, cx| controller.teardown(cx));
        let tasks = self.scheduler.cancel_owner(key);
        let bindings = self.bindings.remove_page(key);
        if let Some(entry) = self.entry_mut(key) {
            entry.gate.close();
            entry.container = None;
            entry.status = PageStatus::Unmounted;
        }
        self.release_capture(key);
        debug!(page = key.0, container = container_id, tasks, bindings, "page unmounted");
        true
    }

    /// Releases `key`'s capture claim and hands ownership to the next waiting page.
    pub(super) fn release_capture(&mut self, key: PageKey) {
        let was_owner = self.capture.is_owner(key);
        let promoted = self.capture.release(key);
        if was_owner {
            self.deliver(key, PageEvent::CaptureChanged { owned: false });
        }
        if let Some(next) = promoted {
            debug!(from = key.0, to = next.0, "input capture handed over");
            self.deliver(next, PageEvent::CaptureChanged { owned: true });
        }
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn page_key(&self, container_id: &str) -> Option<PageKey> {
        self.page_by_id(container_id).map(|entry| entry.key)
    }

    #[must_use]
    pub fn page_status(&self, container_id: &str) -> Option<PageStatus> {
        self.page_by_id(container_id)
            .map(|entry| entry.status.clone())
    }

    #[must_use]
    pub fn is_visible(&self, container_id: &str) -> bool {
        self.page_by_id(container_id)
            .is_some_and(|entry| entry.gate.is_visible())
    }

    /// Container id of the page that currently owns wheel/keyboard capture.
    #[must_use]
    pub fn capture_owner(&self) -> Option<&str> {
        let owner = self.capture.owner()?;
        self.entry(owner)
            .map(|entry| entry.controller.container_id())
    }

    #[must_use]
    pub fn capture_waiting(&self) -> Vec<&str> {
        self.capture
            .waiting()
            .into_iter()
            .filter_map(|key| self.entry(key))
            .map(|entry| entry.controller.container_id())
            .collect()
    }
}
