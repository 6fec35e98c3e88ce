//! Timed visual effects: a virtual-time scheduler, cancelable sequences and
//! numeric count-ups.

pub mod count_up;
pub mod scheduler;
pub mod sequence;

pub use count_up::{CountUp, group_thousands};
pub use scheduler::{
    EffectFn, FrameTick, Flow, PageTimers, Scheduler, TaskId, TimerGroup, TimerToken,
};
pub use sequence::{AnimationSequence, AnimationStep, SequenceState, StepAction, StepEffect};
