//! Observer hooks for hosts.
//!
//! Listeners see document-scoped signals without being able to reach into
//! page state.

pub mod signals;

pub use signals::{DeckSignal, SignalContext, SignalListener};
