use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::animation::count_up::CountUp;
use crate::animation::scheduler::{TimerGroup, TimerToken};
use crate::api::PageContext;
use crate::core::{NodeId, Sandbox};

pub type StepEffect = Rc<dyn Fn(&mut Sandbox<'_>)>;

#[derive(Clone)]
pub enum StepAction {
    /// Side effect over the page sandbox (class toggles, styles, synthesized nodes).
    Effect(StepEffect),
    /// Frame-driven count-up written into a node's text.
    CountUp { node: NodeId, count: CountUp },
    /// Wake-up delivered to the page controller.
    Wake(TimerToken),
}

impl fmt::Debug for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Effect(_) => f.write_str("Effect(..)"),
            Self::CountUp { node, count } => f
                .debug_struct("CountUp")
                .field("node", node)
                .field("count", count)
                .finish(),
            Self::Wake(token) => f.debug_tuple("Wake").field(token).finish(),
        }
    }
}

/// One entry of a sequence. `at` is measured from the start of the run, not
/// from the previous step.
#[derive(Debug, Clone)]
pub struct AnimationStep {
    pub at: Duration,
    pub action: StepAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceState {
    /// Never played, or cancelled.
    Idle,
    /// At least one step is still pending.
    Running,
    /// Played and every step has fired.
    Settled,
}

/// Ordered, replayable, cancelable list of timed effects.
///
/// All steps of a run share one timer group. Playing again cancels the group
/// first, so no step of a previous run can fire after a restart.
#[derive(Clone, Default)]
pub struct AnimationSequence {
    steps: Vec<AnimationStep>,
    reset: Option<StepEffect>,
    group: Option<TimerGroup>,
    started: bool,
}

impl fmt::Debug for AnimationSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationSequence")
            .field("steps", &self.steps)
            .field("has_reset", &self.reset.is_some())
            .field("group", &self.group)
            .field("started", &self.started)
            .finish()
    }
}

impl AnimationSequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn at(mut self, at: Duration, effect: impl Fn(&mut Sandbox<'_>) + 'static) -> Self {
        self.push(AnimationStep {
            at,
            action: StepAction::Effect(Rc::new(effect)),
        });
        self
    }

    #[must_use]
    pub fn count_up_at(mut self, at: Duration, node: NodeId, count: CountUp) -> Self {
        self.push(AnimationStep {
            at,
            action: StepAction::CountUp { node, count },
        });
        self
    }

    #[must_use]
    pub fn wake_at(mut self, at: Duration, token: TimerToken) -> Self {
        self.push(AnimationStep {
            at,
            action: StepAction::Wake(token),
        });
        self
    }

    /// Adds one step per node at `start`, `start + interval`, `start + 2 * interval`...
    #[must_use]
    pub fn stagger(
        mut self,
        start: Duration,
        interval: Duration,
        nodes: &[NodeId],
        effect: impl Fn(&mut Sandbox<'_>, NodeId) + 'static,
    ) -> Self {
        let effect = Rc::new(effect);
        for (i, node) in nodes.iter().copied().enumerate() {
            let effect = Rc::clone(&effect);
            self.push(AnimationStep {
                at: start + interval * i as u32,
                action: StepAction::Effect(Rc::new(move |sandbox| effect(sandbox, node))),
            });
        }
        self
    }

    /// Effect applied by [`Self::reset`] to revert transient state.
    #[must_use]
    pub fn on_reset(mut self, effect: impl Fn(&mut Sandbox<'_>) + 'static) -> Self {
        self.reset = Some(Rc::new(effect));
        self
    }

    pub fn push(&mut self, step: AnimationStep) {
        self.steps.push(step);
    }

    #[must_use]
    pub fn steps(&self) -> &[AnimationStep] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Time of the last step relative to the start of a run.
    #[must_use]
    pub fn total_span(&self) -> Duration {
        self.steps
            .iter()
            .map(|step| match &step.action {
                StepAction::CountUp { count, .. } => step.at.saturating_add(count.duration),
                _ => step.at,
            })
            .max()
            .unwrap_or_default()
    }

    /// Schedules a fresh run, cancelling whatever the previous run left pending.
    pub fn play(&mut self, cx: &mut PageContext<'_>) {
        let cancelled = self.cancel(cx);
        let timers = cx.timers();
        let group = *self.group.get_or_insert_with(|| timers.group());
        for step in &self.steps {
            match &step.action {
                StepAction::Effect(effect) => {
                    let effect = Rc::clone(effect);
                    timers.after(Some(group), step.at, move |sandbox| effect(sandbox));
                }
                StepAction::CountUp { node, count } => {
                    let frame = count.into_effect(*node);
                    timers.frames(Some(group), step.at, count.duration, frame);
                }
                StepAction::Wake(token) => {
                    timers.wake_after(Some(group), step.at, *token);
                }
            }
        }
        self.started = true;
        debug!(
            steps = self.steps.len(),
            cancelled, "animation sequence started"
        );
    }

    /// Drops every pending step of the current run; returns how many were pending.
    pub fn cancel(&mut self, cx: &mut PageContext<'_>) -> usize {
        self.started = false;
        match self.group {
            Some(group) => cx.timers().cancel_group(group),
            None => 0,
        }
    }

    /// Cancels the run and reverts its visible state so the next play starts fresh.
    pub fn reset(&mut self, cx: &mut PageContext<'_>) {
        let cancelled = self.cancel(cx);
        if let Some(reset) = &self.reset {
            reset(cx.dom());
        }
        debug!(cancelled, "animation sequence reset");
    }

    #[must_use]
    pub fn state(&self, cx: &PageContext<'_>) -> SequenceState {
        if !self.started {
            return SequenceState::Idle;
        }
        match self.group {
            Some(group) if cx.pending_in_group(group) > 0 => SequenceState::Running,
            _ => SequenceState::Settled,
        }
    }
}
