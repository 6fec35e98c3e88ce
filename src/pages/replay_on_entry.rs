use std::time::Duration;

use tracing::debug;

use crate::animation::{AnimationSequence, TimerGroup, TimerToken};
use crate::api::{PageContext, PageController, PageEvent, PageOptions};
use crate::core::Mounted;
use crate::interaction::VisibilityChange;
use crate::pages::fountain::{FountainNodes, finale_sequence};

const PLAY: TimerToken = TimerToken(0);
const ENTRY_DELAY: Duration = Duration::from_millis(500);
const FADE_IN_AT: Duration = Duration::from_millis(100);

/// Stand-alone finale that replays from scratch every time the page
/// scrolls into view and resets when it leaves.
pub struct ReplayOnEntryPage {
    container_id: String,
    threshold: f64,
    sequence: Option<AnimationSequence>,
    entry: Option<TimerGroup>,
}

impl ReplayOnEntryPage {
    #[must_use]
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            threshold: 0.5,
            sequence: None,
            entry: None,
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    fn cancel_entry(&mut self, cx: &mut PageContext<'_>) {
        if let Some(group) = self.entry {
            cx.timers().cancel_group(group);
        }
    }
}

impl PageController for ReplayOnEntryPage {
    fn container_id(&self) -> &str {
        &self.container_id
    }

    fn options(&self) -> PageOptions {
        PageOptions::new().with_visibility_threshold(self.threshold)
    }

    fn mount(&mut self, cx: &mut PageContext<'_>) -> Mounted {
        let dom = cx.dom();
        let nodes = FountainNodes::locate(dom, dom.root())?;

        if let Some(visual) = dom.first_class_in(dom.root(), "visual-area") {
            dom.set_style(visual, "opacity", "0");
            dom.set_style(visual, "transform", "translateY(20px)");
            cx.timers().after(None, FADE_IN_AT, move |dom| {
                dom.set_style(visual, "transition", "all 0.8s ease-out");
                dom.set_style(visual, "opacity", "1");
                dom.set_style(visual, "transform", "translateY(0)");
            });
        }

        self.cancel_entry(cx);
        if let Some(previous) = self.sequence.as_mut() {
            previous.reset(cx);
        }
        self.sequence = Some(finale_sequence(&nodes, cx.particle_seed()));
        if self.entry.is_none() {
            self.entry = Some(cx.timers().group());
        }
        // Re-initialized while in view: the gate will not fire again.
        if cx.is_visible() {
            let group = self.entry;
            cx.timers().wake_after(group, ENTRY_DELAY, PLAY);
        }
        Ok(())
    }

    fn on_event(&mut self, cx: &mut PageContext<'_>, event: PageEvent) {
        match event {
            PageEvent::Visibility(VisibilityChange::Entered) => {
                self.cancel_entry(cx);
                let group = self.entry;
                cx.timers().wake_after(group, ENTRY_DELAY, PLAY);
            }
            PageEvent::Visibility(VisibilityChange::Left) => {
                self.cancel_entry(cx);
                if let Some(sequence) = self.sequence.as_mut() {
                    sequence.reset(cx);
                }
                debug!(page = cx.key().0, "finale reset on exit");
            }
            PageEvent::Timer(PLAY) => {
                if let Some(sequence) = self.sequence.as_mut() {
                    sequence.reset(cx);
                    sequence.play(cx);
                }
            }
            _ => {}
        }
    }

    fn teardown(&mut self, cx: &mut PageContext<'_>) {
        self.cancel_entry(cx);
        if let Some(sequence) = self.sequence.as_mut() {
            sequence.reset(cx);
        }
    }
}
