use std::time::Duration;

use tracing::trace;

use crate::animation::{Flow, PageTimers, Scheduler, TaskId};
use crate::animation::scheduler::{ScheduledTask, TaskKind};
use crate::chart::ChartBackend;
use crate::core::{Document, NodeId, PageKey, Sandbox, Viewport};
use crate::error::DeckResult;
use crate::extensions::{DeckSignal, SignalListener};
use crate::interaction::{CaptureRegistry, VisibilityGate};

use super::bindings::BindingTable;
use super::page::{PageContext, PageController, PageEnvironment, PageEvent, PageOptions, PageStatus};
use super::validation::validate_config;
use super::DeckConfig;

pub(super) struct PageEntry {
    pub(super) key: PageKey,
    pub(super) controller: Box<dyn PageController>,
    pub(super) options: PageOptions,
    pub(super) gate: VisibilityGate,
    pub(super) container: Option<NodeId>,
    pub(super) status: PageStatus,
    /// A `WhenVisible` resize flushed while hidden; replayed on the next entry.
    pub(super) resize_stale: bool,
}

/// Headless runtime for one deck document.
///
/// Single-threaded and host-driven: nothing happens between calls, and time
/// only moves through [`Deck::advance`].
pub struct Deck<B: ChartBackend> {
    pub(super) backend: B,
    pub(super) document: Document,
    pub(super) scheduler: Scheduler,
    pub(super) pages: Vec<PageEntry>,
    pub(super) bindings: BindingTable,
    pub(super) capture: CaptureRegistry,
    pub(super) listeners: Vec<Box<dyn SignalListener>>,
    pub(super) config: DeckConfig,
    pub(super) viewport: Viewport,
    pub(super) scroll_y: f64,
    pub(super) pending_resize: Option<TaskId>,
    pub(super) booted: bool,
    pub(super) remounting: bool,
}

impl<B: ChartBackend> Deck<B> {
    /// Creates a deck over an empty document (just a `body` root).
    pub fn new(backend: B, config: DeckConfig) -> DeckResult<Self> {
        Self::with_document(backend, config, Document::new())
    }

    pub fn with_document(backend: B, config: DeckConfig, document: Document) -> DeckResult<Self> {
        validate_config(&config)?;
        Ok(Self {
            backend,
            document,
            scheduler: Scheduler::new(config.frame_interval()),
            pages: Vec::new(),
            bindings: BindingTable::default(),
            capture: CaptureRegistry::default(),
            listeners: Vec::new(),
            viewport: config.viewport,
            config,
            scroll_y: 0.0,
            pending_resize: None,
            booted: false,
            remounting: false,
        })
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Host-side document access, e.g. to build markup before [`Deck::boot`].
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }

    #[must_use]
    pub fn config(&self) -> DeckConfig {
        self.config
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    #[must_use]
    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    /// Moves the virtual clock forward, firing every task that comes due in order.
    ///
    /// Tasks scheduled while advancing fire in the same call if they fall
    /// inside the window.
    pub fn advance(&mut self, delta: Duration) {
        let until = self.scheduler.now().saturating_add(delta);
        while let Some(task) = self.scheduler.pop_due(until) {
            self.run_task(task);
        }
        self.scheduler.settle_at(until);
    }

    fn run_task(&mut self, mut task: ScheduledTask) {
        trace!(task = ?task.id, due_ms = task.due.as_millis() as u64, "task fired");
        let tick = task.tick();
        let flow = match &mut task.kind {
            TaskKind::Effect(effect) => {
                let Some(root) = task.owner.and_then(|owner| self.mounted_container(owner)) else {
                    return;
                };
                let mut sandbox = Sandbox::new(&mut self.document, root);
                effect(&mut sandbox, tick)
            }
            TaskKind::Wake(token) => {
                let token = *token;
                if let Some(owner) = task.owner {
                    self.deliver(owner, PageEvent::Timer(token));
                }
                Flow::Done
            }
            TaskKind::FlushResize => {
                self.flush_resize();
                Flow::Done
            }
        };
        if flow == Flow::NextFrame {
            self.scheduler.requeue_frame(task);
        }
    }

    pub(super) fn page_index(&self, key: PageKey) -> Option<usize> {
        self.pages.iter().position(|entry| entry.key == key)
    }

    pub(super) fn page_by_id(&self, container_id: &str) -> Option<&PageEntry> {
        self.pages
            .iter()
            .find(|entry| entry.controller.container_id() == container_id)
    }

    pub(super) fn entry(&self, key: PageKey) -> Option<&PageEntry> {
        self.pages.iter().find(|entry| entry.key == key)
    }

    pub(super) fn entry_mut(&mut self, key: PageKey) -> Option<&mut PageEntry> {
        self.pages.iter_mut().find(|entry| entry.key == key)
    }

    fn mounted_container(&self, key: PageKey) -> Option<NodeId> {
        self.entry(key)
            .filter(|entry| entry.status.is_mounted())
            .and_then(|entry| entry.container)
    }

    /// Runs `f` with the page's controller and a context scoped to its
    /// container, then dispatches whatever signals the page emitted.
    pub(super) fn with_page<R>(
        &mut self,
        key: PageKey,
        f: impl FnOnce(&mut dyn PageController, &mut PageContext<'_>) -> R,
    ) -> Option<R> {
        let index = self.page_index(key)?;
        let mut outbox = Vec::new();
        let result = {
            let entry = &mut self.pages[index];
            let root = entry.container?;
            let env = PageEnvironment {
                viewport: self.viewport,
                visible: entry.gate.is_visible(),
                input_cooldown: self.config.input_cooldown(),
                particle_seed: self.config.particle_seed,
            };
            let mut cx = PageContext::new(
                key,
                Sandbox::new(&mut self.document, root),
                PageTimers::new(&mut self.scheduler, key),
                &mut self.backend,
                &mut self.bindings,
                &mut outbox,
                env,
            );
            f(entry.controller.as_mut(), &mut cx)
        };
        for signal in outbox {
            self.dispatch_signal(Some(key), signal);
        }
        Some(result)
    }

    /// Delivers `event` to a mounted page. Returns `false` when the page is
    /// not mounted.
    pub(super) fn deliver(&mut self, key: PageKey, event: PageEvent) -> bool {
        if self.mounted_container(key).is_none() {
            return false;
        }
        self.with_page(key, |controller, cx| controller.on_event(cx, event))
            .is_some()
    }

    /// Emits a host-originated signal.
    pub fn emit(&mut self, signal: DeckSignal) {
        self.dispatch_signal(None, signal);
    }
}
