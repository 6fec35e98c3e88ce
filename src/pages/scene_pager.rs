use std::time::Duration;

use tracing::debug;

use crate::animation::AnimationSequence;
use crate::api::{ActionTag, BindingKind, PageContext, PageController, PageEvent, PageOptions};
use crate::core::{Element, Mounted, NodeId};
use crate::interaction::{InputDisposition, InputEvent, PagerStep, ScenePager};
use crate::pages::fountain::{FountainNodes, finale_sequence};

pub const SCENE_CLASS: &str = "scene";
pub const PAGINATION_CLASS: &str = "pagination";
pub const DOT_CLASS: &str = "dot";
pub const ACTIVE_CLASS: &str = "is-active";
pub const HINT_ID: &str = "scroll-hint";

/// Full-viewport page that swallows wheel and arrow input to step through
/// its scenes, releasing input to native scrolling past the first and last one.
pub struct ScenePagerPage {
    container_id: String,
    threshold: f64,
    finale_scene: Option<usize>,
    pager: ScenePager,
    scenes: Vec<NodeId>,
    dots: Vec<NodeId>,
    hint: Option<NodeId>,
    finale: Option<AnimationSequence>,
}

impl ScenePagerPage {
    #[must_use]
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            threshold: 0.5,
            finale_scene: None,
            pager: ScenePager::new(0, Duration::ZERO),
            scenes: Vec::new(),
            dots: Vec::new(),
            hint: None,
            finale: None,
        }
    }

    /// Plays the fountain finale whenever scene `index` becomes active.
    #[must_use]
    pub fn with_finale(mut self, index: usize) -> Self {
        self.finale_scene = Some(index);
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn scene_index(&self) -> usize {
        self.pager.index()
    }

    fn show_scene(&mut self, cx: &mut PageContext<'_>, index: usize) {
        let dom = cx.dom();
        for (i, scene) in self.scenes.iter().enumerate() {
            dom.toggle_class(*scene, ACTIVE_CLASS, i == index);
        }
        for (i, dot) in self.dots.iter().enumerate() {
            dom.toggle_class(*dot, ACTIVE_CLASS, i == index);
        }
        if let Some(hint) = self.hint {
            dom.toggle_class(hint, "hidden", index > 0);
        }
        if let Some(finale) = self.finale.as_mut() {
            finale.reset(cx);
            if self.finale_scene == Some(index) {
                finale.play(cx);
            }
        }
        debug!(page = cx.key().0, scene = index, "scene shown");
    }
}

impl PageController for ScenePagerPage {
    fn container_id(&self) -> &str {
        &self.container_id
    }

    fn options(&self) -> PageOptions {
        PageOptions::new()
            .capturing_input()
            .with_visibility_threshold(self.threshold)
    }

    fn mount(&mut self, cx: &mut PageContext<'_>) -> Mounted {
        let dom = cx.dom();
        let scenes = dom.require_class(SCENE_CLASS)?;
        let pagination = dom.require_class_in(dom.root(), PAGINATION_CLASS)?;
        let hint = dom.find_id(HINT_ID);
        let finale_nodes = match self.finale_scene {
            Some(index) => match scenes.get(index) {
                Some(scope) => Some(FountainNodes::locate(dom, *scope)?),
                None => None,
            },
            None => None,
        };

        if let Some(previous) = self.finale.as_mut() {
            previous.cancel(cx);
        }
        for dot in std::mem::take(&mut self.dots) {
            cx.unbind(dot, BindingKind::Click);
        }
        let dom = cx.dom();
        dom.clear_children(pagination);
        let dots: Vec<NodeId> = (0..scenes.len())
            .filter_map(|_| dom.append(pagination, Element::new("div").with_class(DOT_CLASS)))
            .collect();

        self.pager = ScenePager::new(scenes.len(), cx.input_cooldown());
        self.scenes = scenes;
        self.hint = hint;
        self.finale = finale_nodes.map(|nodes| finale_sequence(&nodes, cx.particle_seed()));
        for (index, dot) in dots.iter().enumerate() {
            cx.bind_click(*dot, ActionTag(index as u32));
        }
        self.dots = dots;
        self.show_scene(cx, 0);
        Ok(())
    }

    fn on_event(&mut self, cx: &mut PageContext<'_>, event: PageEvent) {
        let PageEvent::Click { action, .. } = event else {
            return;
        };
        let target = action.0 as usize;
        if let PagerStep::Moved { to, .. } = self.pager.go_to(target, cx.now()) {
            self.show_scene(cx, to);
        }
    }

    fn on_input(&mut self, cx: &mut PageContext<'_>, input: InputEvent) -> InputDisposition {
        let Some(direction) = input.direction() else {
            return InputDisposition::PassThrough;
        };
        match self.pager.step(direction, cx.now()) {
            PagerStep::Moved { to, .. } => {
                self.show_scene(cx, to);
                InputDisposition::Consumed
            }
            PagerStep::Throttled => InputDisposition::Consumed,
            PagerStep::FallThrough | PagerStep::Ignored => InputDisposition::PassThrough,
        }
    }

    fn teardown(&mut self, cx: &mut PageContext<'_>) {
        if let Some(finale) = self.finale.as_mut() {
            finale.reset(cx);
        }
    }
}
