use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::PageContext;
use crate::chart::{ChartHandle, ChartSpec, OptionMerge, SpecShape};
use crate::core::NodeId;
use crate::error::DeckResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderOutcome {
    /// A new render context was created (any previous one was disposed first).
    Rendered,
    /// The live context received a partial option update.
    Updated,
    /// Nothing was rendered: backend unavailable or node outside the page.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartInstance {
    pub handle: ChartHandle,
    pub shape: SpecShape,
}

/// Owns the (at most one) live chart bound to a node of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSlot {
    node: NodeId,
    instance: Option<ChartInstance>,
}

impl ChartSlot {
    #[must_use]
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            instance: None,
        }
    }

    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    #[must_use]
    pub fn instance(&self) -> Option<&ChartInstance> {
        self.instance.as_ref()
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.instance.is_some()
    }

    fn can_render(&self, cx: &mut PageContext<'_>) -> bool {
        if !cx.dom().contains(self.node) {
            warn!(
                node = self.node.index(),
                "chart target lies outside the page container"
            );
            return false;
        }
        if !cx.charts().is_available() {
            debug!(
                node = self.node.index(),
                "charting capability unavailable, skipping"
            );
            return false;
        }
        true
    }

    /// Disposes any live chart on the node, then creates a new one from `spec`.
    pub fn render(
        &mut self,
        cx: &mut PageContext<'_>,
        spec: &ChartSpec,
    ) -> DeckResult<RenderOutcome> {
        if !self.can_render(cx) {
            return Ok(RenderOutcome::Skipped);
        }
        spec.validate()?;
        self.dispose(cx)?;

        let backend = cx.charts();
        let handle = backend.init(self.node)?;
        if let Err(err) = backend.set_option(handle, spec, OptionMerge::Replace) {
            backend.dispose(handle)?;
            return Err(err);
        }
        self.instance = Some(ChartInstance {
            handle,
            shape: spec.shape(),
        });
        debug!(node = self.node.index(), handle = handle.0, "chart created");
        Ok(RenderOutcome::Rendered)
    }

    /// Applies `spec` as a partial update when its shape matches the live
    /// chart, otherwise falls back to a full [`Self::render`].
    pub fn update(
        &mut self,
        cx: &mut PageContext<'_>,
        spec: &ChartSpec,
    ) -> DeckResult<RenderOutcome> {
        let shape = spec.shape();
        let handle = match &self.instance {
            Some(instance) if instance.shape == shape => instance.handle,
            _ => return self.render(cx, spec),
        };
        if !self.can_render(cx) {
            return Ok(RenderOutcome::Skipped);
        }
        spec.validate()?;
        cx.charts().set_option(handle, spec, OptionMerge::Merge)?;
        Ok(RenderOutcome::Updated)
    }

    /// Returns `true` when a live chart was resized.
    pub fn resize(&mut self, cx: &mut PageContext<'_>) -> DeckResult<bool> {
        match &self.instance {
            Some(instance) => {
                cx.charts().resize(instance.handle)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Returns `true` when a live chart was disposed.
    pub fn dispose(&mut self, cx: &mut PageContext<'_>) -> DeckResult<bool> {
        match self.instance.take() {
            Some(instance) => {
                cx.charts().dispose(instance.handle)?;
                debug!(
                    node = self.node.index(),
                    handle = instance.handle.0,
                    "chart disposed"
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
