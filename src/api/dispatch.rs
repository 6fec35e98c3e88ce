use tracing::{debug, trace};

use crate::animation::scheduler::TaskKind;
use crate::chart::ChartBackend;
use crate::core::{NodeId, PageKey, Viewport};
use crate::error::DeckResult;
use crate::interaction::{
    CaptureOutcome, Direction, InputDisposition, InputEvent, Key, VisibilityChange,
};

use super::bindings::{ActionTag, BindingKind};
use super::page::{PageEvent, ResizePolicy};
use super::validation::validate_viewport;
use super::Deck;

impl<B: ChartBackend> Deck<B> {
    /// Routes a wheel event to the page holding input capture.
    pub fn wheel(&mut self, delta_y: f64) -> InputDisposition {
        if Direction::from_wheel(delta_y).is_none() {
            return InputDisposition::PassThrough;
        }
        self.route_input(InputEvent::Wheel { delta_y })
    }

    /// Routes a document-level keydown to the page holding input capture.
    pub fn key_down(&mut self, key: Key) -> InputDisposition {
        self.route_input(InputEvent::Key(key))
    }

    fn route_input(&mut self, input: InputEvent) -> InputDisposition {
        let Some(owner) = self.capture.owner() else {
            return InputDisposition::PassThrough;
        };
        let in_view = self
            .entry(owner)
            .is_some_and(|entry| entry.status.is_mounted() && entry.gate.is_visible());
        if !in_view {
            return InputDisposition::PassThrough;
        }
        trace!(page = owner.0, ?input, "input routed to capture owner");
        self.with_page(owner, |controller, cx| controller.on_input(cx, input))
            .unwrap_or(InputDisposition::PassThrough)
    }

    fn binding_for(
        &self,
        node: NodeId,
        kind: BindingKind,
    ) -> Option<(NodeId, PageKey, ActionTag)> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if let Some((page, action)) = self.bindings.lookup(current, kind) {
                return Some((current, page, action));
            }
            cursor = self.document.parent(current);
        }
        None
    }

    /// Dispatches a click on `node`, bubbling to the nearest bound ancestor.
    ///
    /// Returns `true` when a page received it.
    pub fn click(&mut self, node: NodeId) -> bool {
        if !self.document.is_attached(node) {
            return false;
        }
        let Some((bound, page, action)) = self.binding_for(node, BindingKind::Click) else {
            return false;
        };
        self.deliver(
            page,
            PageEvent::Click {
                node: bound,
                action,
            },
        )
    }

    /// Keydown on a focused node: Enter and Space activate it like a click.
    pub fn key_on(&mut self, node: NodeId, key: Key) -> bool {
        if !key.activates() {
            return false;
        }
        self.click(node)
    }

    pub fn hover(&mut self, node: NodeId, entered: bool) -> bool {
        if !self.document.is_attached(node) {
            return false;
        }
        let Some((bound, page, action)) = self.binding_for(node, BindingKind::Hover) else {
            return false;
        };
        self.deliver(
            page,
            PageEvent::Hover {
                node: bound,
                action,
                entered,
            },
        )
    }

    /// Feeds an externally computed intersection ratio for one page container.
    ///
    /// Returns `false` when no mounted page owns `container_id`.
    pub fn set_intersection(&mut self, container_id: &str, ratio: f64) -> bool {
        let Some(key) = self
            .page_by_id(container_id)
            .filter(|entry| entry.status.is_mounted())
            .map(|entry| entry.key)
        else {
            return false;
        };
        self.apply_ratio(key, ratio);
        true
    }

    fn apply_ratio(&mut self, key: PageKey, ratio: f64) {
        let Some(entry) = self.entry_mut(key) else {
            return;
        };
        let captures_input = entry.options.captures_input;
        let Some(change) = entry.gate.observe(ratio) else {
            return;
        };
        let stale = change == VisibilityChange::Entered && std::mem::take(&mut entry.resize_stale);
        debug!(page = key.0, ?change, ratio, "visibility changed");
        match change {
            VisibilityChange::Entered => {
                self.deliver(key, PageEvent::Visibility(change));
                if stale {
                    debug!(page = key.0, "replaying resize missed while hidden");
                    self.with_page(key, |controller, cx| controller.on_resize(cx));
                }
                if captures_input && self.capture.acquire(key) == CaptureOutcome::Acquired {
                    self.deliver(key, PageEvent::CaptureChanged { owned: true });
                }
            }
            VisibilityChange::Left => {
                if captures_input {
                    self.release_capture(key);
                }
                self.deliver(key, PageEvent::Visibility(change));
            }
        }
    }

    /// Scrolls the document to `scroll_y`, recomputing every mounted page's
    /// intersection from its container layout.
    ///
    /// Pages leaving view are processed before pages entering it, so input
    /// capture passes directly to the incoming page. Afterwards every page
    /// with a layout receives its scroll progress.
    pub fn scroll_to(&mut self, scroll_y: f64) {
        if !scroll_y.is_finite() {
            return;
        }
        self.scroll_y = scroll_y;
        let viewport_height = f64::from(self.viewport.height);
        let mut observed = Vec::new();
        for entry in &self.pages {
            if !entry.status.is_mounted() {
                continue;
            }
            let Some(layout) = entry
                .container
                .and_then(|node| self.document.element(node))
                .and_then(|element| element.layout)
            else {
                continue;
            };
            observed.push((
                entry.key,
                entry.gate.is_visible(),
                layout.intersection_ratio(scroll_y, viewport_height),
                layout.scroll_progress(scroll_y, viewport_height),
            ));
        }

        for (key, _, ratio, _) in observed.iter().filter(|(_, was_visible, _, _)| *was_visible) {
            self.apply_ratio(*key, *ratio);
        }
        for (key, _, ratio, _) in observed.iter().filter(|(_, was_visible, _, _)| !*was_visible) {
            self.apply_ratio(*key, *ratio);
        }
        for (key, _, _, progress) in observed {
            self.deliver(key, PageEvent::ScrollProgress(progress));
        }
    }

    /// Window resize. Page callbacks are debounced: each call restarts the
    /// wait, and only the last one in a burst reaches the pages.
    pub fn resize(&mut self, viewport: Viewport) -> DeckResult<()> {
        validate_viewport(viewport)?;
        self.viewport = viewport;
        if let Some(pending) = self.pending_resize.take() {
            self.scheduler.cancel(pending);
        }
        let task = self.scheduler.schedule(
            None,
            None,
            self.config.resize_debounce(),
            TaskKind::FlushResize,
        );
        self.pending_resize = Some(task);
        Ok(())
    }

    pub(super) fn flush_resize(&mut self) {
        self.pending_resize = None;
        let mut targets: Vec<PageKey> = Vec::new();
        for entry in self.pages.iter_mut().filter(|entry| entry.status.is_mounted()) {
            match entry.options.resize {
                ResizePolicy::Always => targets.push(entry.key),
                ResizePolicy::WhenVisible if entry.gate.is_visible() => targets.push(entry.key),
                ResizePolicy::WhenVisible => entry.resize_stale = true,
                ResizePolicy::Never => {}
            }
        }
        debug!(
            pages = targets.len(),
            width = self.viewport.width,
            height = self.viewport.height,
            "resize flushed"
        );
        for key in targets {
            self.with_page(key, |controller, cx| controller.on_resize(cx));
        }
    }
}
