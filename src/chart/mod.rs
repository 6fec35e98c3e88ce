//! Chart adapter layer.
//!
//! Rendering itself is delegated to an external charting capability reached
//! through the four-operation [`ChartBackend`] contract. Pages only build
//! [`ChartSpec`] values and drive a [`ChartSlot`] per target node.

mod null_backend;
pub mod slot;
pub mod spec;
pub mod transform;

pub use null_backend::{LiveChart, NullChartBackend};
pub use slot::{ChartInstance, ChartSlot, RenderOutcome};
pub use spec::{Axis, AxisKind, ChartSpec, ChartTitle, Series, SeriesKind, SpecShape};
pub use transform::{
    BarExtent, LabeledValue, bar_extents, css_percent, max_finite, ratio_percent, scale_to_max,
};

use serde::{Deserialize, Serialize};

use crate::core::NodeId;
use crate::error::DeckResult;

/// Live render context handle issued by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartHandle(pub u64);

/// How `set_option` combines a spec with the current configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionMerge {
    /// Replace the whole configuration.
    Replace,
    /// Merge into the existing configuration; only valid for identical shapes.
    Merge,
}

/// Contract implemented by any charting capability.
///
/// A handle is bound 1:1 to a node. Backends may refuse to initialize a node
/// that still has a live handle; callers must dispose first.
pub trait ChartBackend {
    /// Capability check performed before any other call.
    fn is_available(&self) -> bool {
        true
    }

    fn init(&mut self, node: NodeId) -> DeckResult<ChartHandle>;

    fn set_option(
        &mut self,
        handle: ChartHandle,
        spec: &ChartSpec,
        merge: OptionMerge,
    ) -> DeckResult<()>;

    fn resize(&mut self, handle: ChartHandle) -> DeckResult<()>;

    fn dispose(&mut self, handle: ChartHandle) -> DeckResult<()>;
}
