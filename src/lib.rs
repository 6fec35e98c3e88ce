//! deck-rs: headless runtime for scroll/click-driven presentation decks.
//!
//! Every page of a deck is an isolated unit that owns one container of the
//! document. The crate formalizes the lifecycle those pages share: resolve the
//! container or stay dormant, mount against sandboxed children, render charts
//! through an external backend, play cancelable timed sequences, and capture
//! global wheel/keyboard input only while the page is in view.
//!
//! Hosts drive a [`Deck`] by forwarding document events and advancing time.

pub mod animation;
pub mod api;
pub mod chart;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod pages;
pub mod telemetry;

pub use api::{Deck, DeckConfig};
pub use error::{DeckError, DeckResult};
