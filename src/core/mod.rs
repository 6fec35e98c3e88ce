pub mod document;
pub mod sandbox;
pub mod types;

pub use document::{Document, Element, NodeId, NodeSnapshot};
pub use sandbox::{Missing, Mounted, Resolution, Sandbox};
pub use types::{LayoutRect, PageKey, Viewport};
