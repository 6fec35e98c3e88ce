use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::animation::{PageTimers, TimerGroup, TimerToken};
use crate::chart::ChartBackend;
use crate::core::{Mounted, NodeId, PageKey, Sandbox, Viewport};
use crate::extensions::DeckSignal;
use crate::interaction::{InputDisposition, InputEvent, VisibilityChange};

use super::bindings::{ActionTag, BindingKind, BindingTable};

/// When a page wants `on_resize` after a debounced window resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResizePolicy {
    #[default]
    Always,
    /// Only while the page's visibility gate is open; hidden pages skip the layout work.
    WhenVisible,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageOptions {
    /// Whether the page competes for global wheel/keyboard capture while in view.
    pub captures_input: bool,
    /// Overrides the deck-wide visibility threshold.
    pub visibility_threshold: Option<f64>,
    pub resize: ResizePolicy,
}

impl PageOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn capturing_input(mut self) -> Self {
        self.captures_input = true;
        self
    }

    #[must_use]
    pub fn with_visibility_threshold(mut self, threshold: f64) -> Self {
        self.visibility_threshold = Some(threshold);
        self
    }

    #[must_use]
    pub fn with_resize(mut self, resize: ResizePolicy) -> Self {
        self.resize = resize;
        self
    }
}

/// Events delivered to a mounted page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PageEvent {
    /// A click (or Enter/Space) reached a bound node. `node` is the bound
    /// node, which may be an ancestor of the element actually clicked.
    Click { node: NodeId, action: ActionTag },
    Hover {
        node: NodeId,
        action: ActionTag,
        entered: bool,
    },
    Visibility(VisibilityChange),
    /// `(scroll_y - container_top) / viewport_height`, unclamped.
    ScrollProgress(f64),
    Timer(TimerToken),
    /// The page gained or lost global input capture.
    CaptureChanged { owned: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageStatus {
    /// Registered before the document was ready.
    Registered,
    /// The container is not part of the document; the page does nothing.
    Dormant,
    /// The container exists but a required child does not.
    Skipped { missing: String },
    Mounted,
    Unmounted,
}

impl PageStatus {
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        matches!(self, Self::Mounted)
    }
}

/// One page of a deck.
///
/// Implementations supply data and a handful of callbacks; the deck resolves
/// the container, scopes every DOM access to it and routes events back.
pub trait PageController {
    /// Id of the container element this page owns.
    fn container_id(&self) -> &str;

    fn options(&self) -> PageOptions {
        PageOptions::default()
    }

    /// Locates required children, binds controls and renders initial state.
    ///
    /// Called on document-ready and again on every page-changed signal, so it
    /// must be safe to run twice. Return `Err(Missing)` (usually through `?`
    /// on a `require_*` lookup) to abort silently.
    fn mount(&mut self, cx: &mut PageContext<'_>) -> Mounted;

    fn on_event(&mut self, cx: &mut PageContext<'_>, event: PageEvent) {
        let _ = (cx, event);
    }

    /// Global input, delivered only while this page owns capture.
    fn on_input(&mut self, cx: &mut PageContext<'_>, input: InputEvent) -> InputDisposition {
        let _ = (cx, input);
        InputDisposition::PassThrough
    }

    fn on_resize(&mut self, cx: &mut PageContext<'_>) {
        let _ = cx;
    }

    fn teardown(&mut self, cx: &mut PageContext<'_>) {
        let _ = cx;
    }
}

/// Everything a page may touch during one callback.
pub struct PageContext<'a> {
    key: PageKey,
    sandbox: Sandbox<'a>,
    timers: PageTimers<'a>,
    charts: &'a mut dyn ChartBackend,
    bindings: &'a mut BindingTable,
    outbox: &'a mut Vec<DeckSignal>,
    viewport: Viewport,
    visible: bool,
    input_cooldown: Duration,
    particle_seed: u64,
}

pub(crate) struct PageEnvironment {
    pub(crate) viewport: Viewport,
    pub(crate) visible: bool,
    pub(crate) input_cooldown: Duration,
    pub(crate) particle_seed: u64,
}

impl<'a> PageContext<'a> {
    pub(crate) fn new(
        key: PageKey,
        sandbox: Sandbox<'a>,
        timers: PageTimers<'a>,
        charts: &'a mut dyn ChartBackend,
        bindings: &'a mut BindingTable,
        outbox: &'a mut Vec<DeckSignal>,
        env: PageEnvironment,
    ) -> Self {
        Self {
            key,
            sandbox,
            timers,
            charts,
            bindings,
            outbox,
            viewport: env.viewport,
            visible: env.visible,
            input_cooldown: env.input_cooldown,
            particle_seed: env.particle_seed,
        }
    }

    #[must_use]
    pub fn key(&self) -> PageKey {
        self.key
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether the page's visibility gate is currently open.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn input_cooldown(&self) -> Duration {
        self.input_cooldown
    }

    #[must_use]
    pub fn particle_seed(&self) -> u64 {
        self.particle_seed
    }

    pub fn dom(&mut self) -> &mut Sandbox<'a> {
        &mut self.sandbox
    }

    #[must_use]
    pub fn dom_ref(&self) -> &Sandbox<'a> {
        &self.sandbox
    }

    pub fn timers(&mut self) -> &mut PageTimers<'a> {
        &mut self.timers
    }

    #[must_use]
    pub fn pending_in_group(&self, group: TimerGroup) -> usize {
        self.timers.pending_in_group(group)
    }

    pub fn charts(&mut self) -> &mut (dyn ChartBackend + 'a) {
        &mut *self.charts
    }

    /// Binds `node` so matching events reach this page tagged with `action`.
    ///
    /// Nodes outside the page container are refused.
    pub fn bind(&mut self, node: NodeId, kind: BindingKind, action: ActionTag) -> bool {
        if !self.sandbox.contains(node) {
            warn!(
                page = self.key.0,
                node = node.index(),
                "refusing binding outside page container"
            );
            return false;
        }
        self.bindings.bind(self.key, node, kind, action);
        true
    }

    pub fn bind_click(&mut self, node: NodeId, action: ActionTag) -> bool {
        self.bind(node, BindingKind::Click, action)
    }

    pub fn bind_hover(&mut self, node: NodeId, action: ActionTag) -> bool {
        self.bind(node, BindingKind::Hover, action)
    }

    pub fn unbind(&mut self, node: NodeId, kind: BindingKind) -> bool {
        self.bindings.unbind(self.key, node, kind)
    }

    /// Queues a document-scoped signal, dispatched when the callback returns.
    pub fn emit(&mut self, signal: DeckSignal) {
        self.outbox.push(signal);
    }
}
