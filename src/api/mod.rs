//! Host-facing deck facade.
//!
//! A [`Deck`] owns the document, the virtual clock, the chart backend and the
//! registered page controllers. Hosts forward document events to it and
//! advance time; pages only ever see a [`PageContext`] scoped to their own
//! container.

mod bindings;
mod config;
mod deck;
mod dispatch;
mod page;
mod page_registry;
mod signal_registry;
mod snapshot;
mod validation;

pub use bindings::{ActionTag, BindingKind, BindingTable};
pub use config::DeckConfig;
pub use deck::Deck;
pub use page::{PageContext, PageController, PageEvent, PageOptions, PageStatus, ResizePolicy};
pub use snapshot::{DECK_SNAPSHOT_JSON_SCHEMA_V1, DeckSnapshot, DeckSnapshotJsonContractV1, PageSnapshot};
