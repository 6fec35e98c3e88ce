use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{PageKey, Sandbox};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(u64);

/// Handle for a set of pending tasks that are cancelled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerGroup(u64);

/// Opaque value delivered back to a page controller when a wake-up fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken(pub u32);

/// Timing passed to a running effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Virtual time at which the effect runs.
    pub now: Duration,
    /// Time since the frame loop started; zero for one-shot effects.
    pub elapsed: Duration,
}

/// Continuation returned by an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Done,
    NextFrame,
}

pub type EffectFn = Box<dyn FnMut(&mut Sandbox<'_>, FrameTick) -> Flow>;

pub(crate) enum TaskKind {
    Effect(EffectFn),
    Wake(TimerToken),
    FlushResize,
}

#[derive(Debug, Clone, Copy)]
struct FrameClock {
    started_at: Duration,
    deadline: Option<Duration>,
}

pub(crate) struct ScheduledTask {
    pub(crate) id: TaskId,
    pub(crate) owner: Option<PageKey>,
    group: Option<TimerGroup>,
    pub(crate) due: Duration,
    frames: Option<FrameClock>,
    pub(crate) kind: TaskKind,
}

impl ScheduledTask {
    pub(crate) fn tick(&self) -> FrameTick {
        let elapsed = self
            .frames
            .map(|clock| self.due.saturating_sub(clock.started_at))
            .unwrap_or_default();
        FrameTick {
            now: self.due,
            elapsed,
        }
    }
}

/// Single-threaded virtual-time scheduler.
///
/// Tasks fire in `(due, insertion)` order. Time only moves when the host
/// advances it, so every timer and frame callback is deterministic.
pub struct Scheduler {
    now: Duration,
    frame_interval: Duration,
    next_seq: u64,
    next_task: u64,
    next_group: u64,
    queue: BTreeMap<(Duration, u64), ScheduledTask>,
}

impl Scheduler {
    #[must_use]
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            frame_interval,
            next_seq: 0,
            next_task: 0,
            next_group: 0,
            queue: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn pending_for(&self, owner: PageKey) -> usize {
        self.queue
            .values()
            .filter(|task| task.owner == Some(owner))
            .count()
    }

    #[must_use]
    pub fn pending_in_group(&self, group: TimerGroup) -> usize {
        self.queue
            .values()
            .filter(|task| task.group == Some(group))
            .count()
    }

    pub fn new_group(&mut self) -> TimerGroup {
        self.next_group += 1;
        TimerGroup(self.next_group)
    }

    fn insert(&mut self, task: ScheduledTask) -> TaskId {
        let id = task.id;
        self.next_seq += 1;
        self.queue.insert((task.due, self.next_seq), task);
        id
    }

    fn next_task_id(&mut self) -> TaskId {
        self.next_task += 1;
        TaskId(self.next_task)
    }

    pub(crate) fn schedule(
        &mut self,
        owner: Option<PageKey>,
        group: Option<TimerGroup>,
        delay: Duration,
        kind: TaskKind,
    ) -> TaskId {
        let id = self.next_task_id();
        let due = self.now.saturating_add(delay);
        trace!(task = id.0, due_ms = due.as_millis() as u64, "task scheduled");
        self.insert(ScheduledTask {
            id,
            owner,
            group,
            due,
            frames: None,
            kind,
        })
    }

    /// Schedules a frame loop that starts after `delay` and runs for `span`.
    ///
    /// Frames land on `frame_interval` boundaries measured from the loop
    /// start; the last frame is pulled in to land exactly on `start + span`.
    pub(crate) fn schedule_frames(
        &mut self,
        owner: PageKey,
        group: Option<TimerGroup>,
        delay: Duration,
        span: Duration,
        effect: EffectFn,
    ) -> TaskId {
        let id = self.next_task_id();
        let started_at = self.now.saturating_add(delay);
        let deadline = started_at.saturating_add(span);
        let due = started_at.saturating_add(self.frame_interval).min(deadline);
        self.insert(ScheduledTask {
            id,
            owner: Some(owner),
            group,
            due,
            frames: Some(FrameClock {
                started_at,
                deadline: Some(deadline),
            }),
            kind: TaskKind::Effect(effect),
        })
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|_, task| task.id != id);
        before != self.queue.len()
    }

    pub fn cancel_group(&mut self, group: TimerGroup) -> usize {
        let before = self.queue.len();
        self.queue.retain(|_, task| task.group != Some(group));
        before - self.queue.len()
    }

    pub fn cancel_owner(&mut self, owner: PageKey) -> usize {
        let before = self.queue.len();
        self.queue.retain(|_, task| task.owner != Some(owner));
        before - self.queue.len()
    }

    /// Removes and returns the earliest task due at or before `until`,
    /// moving the clock to its due time.
    pub(crate) fn pop_due(&mut self, until: Duration) -> Option<ScheduledTask> {
        let key = *self.queue.keys().next()?;
        if key.0 > until {
            return None;
        }
        let task = self.queue.remove(&key)?;
        self.now = self.now.max(task.due);
        Some(task)
    }

    /// Re-queues an effect that asked for another frame.
    ///
    /// A loop whose deadline has been reached is dropped instead.
    pub(crate) fn requeue_frame(&mut self, mut task: ScheduledTask) {
        let clock = task.frames.get_or_insert(FrameClock {
            started_at: self.now,
            deadline: None,
        });
        let mut due = self.now.saturating_add(self.frame_interval);
        if let Some(deadline) = clock.deadline {
            if deadline <= self.now {
                trace!(task = task.id.0, "frame loop reached its deadline");
                return;
            }
            due = due.min(deadline);
        }
        task.due = due;
        self.insert(task);
    }

    pub(crate) fn settle_at(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

/// Page-scoped facade over the deck scheduler handed to controllers.
///
/// Everything scheduled through it is owned by the page, so unmounting the
/// page cancels it wholesale.
pub struct PageTimers<'a> {
    scheduler: &'a mut Scheduler,
    page: PageKey,
}

impl<'a> PageTimers<'a> {
    pub(crate) fn new(scheduler: &'a mut Scheduler, page: PageKey) -> Self {
        Self { scheduler, page }
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn group(&mut self) -> TimerGroup {
        self.scheduler.new_group()
    }

    /// Runs `effect` once against the page sandbox after `delay`.
    pub fn after(
        &mut self,
        group: Option<TimerGroup>,
        delay: Duration,
        mut effect: impl FnMut(&mut Sandbox<'_>) + 'static,
    ) -> TaskId {
        self.scheduler.schedule(
            Some(self.page),
            group,
            delay,
            TaskKind::Effect(Box::new(move |sandbox, _| {
                effect(sandbox);
                Flow::Done
            })),
        )
    }

    /// Runs `effect` on every frame between `delay` and `delay + span`.
    pub fn frames(
        &mut self,
        group: Option<TimerGroup>,
        delay: Duration,
        span: Duration,
        effect: impl FnMut(&mut Sandbox<'_>, FrameTick) -> Flow + 'static,
    ) -> TaskId {
        self.scheduler
            .schedule_frames(self.page, group, delay, span, Box::new(effect))
    }

    /// Delivers `token` back to the page controller after `delay`.
    pub fn wake_after(
        &mut self,
        group: Option<TimerGroup>,
        delay: Duration,
        token: TimerToken,
    ) -> TaskId {
        self.scheduler
            .schedule(Some(self.page), group, delay, TaskKind::Wake(token))
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let page = self.page;
        let queue = &mut self.scheduler.queue;
        let before = queue.len();
        queue.retain(|_, task| !(task.id == id && task.owner == Some(page)));
        before != queue.len()
    }

    /// Cancels every pending task of this page in `group`.
    pub fn cancel_group(&mut self, group: TimerGroup) -> usize {
        let page = self.page;
        let queue = &mut self.scheduler.queue;
        let before = queue.len();
        queue.retain(|_, task| !(task.group == Some(group) && task.owner == Some(page)));
        before - queue.len()
    }

    #[must_use]
    pub fn pending_in_group(&self, group: TimerGroup) -> usize {
        self.scheduler.pending_in_group(group)
    }
}
