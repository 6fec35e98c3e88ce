use indexmap::IndexMap;

use crate::chart::{ChartBackend, ChartHandle, ChartSpec, OptionMerge};
use crate::core::NodeId;
use crate::error::{DeckError, DeckResult};

/// State of one live chart tracked by [`NullChartBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct LiveChart {
    pub node: NodeId,
    pub spec: Option<ChartSpec>,
    pub option_updates: usize,
    pub resize_count: usize,
}

/// Headless backend used by tests and non-visual hosts.
///
/// It enforces the backend contract strictly: a node may hold at most one
/// live handle, and every call on a disposed handle fails. Leaked render
/// contexts therefore surface as errors instead of silent duplicates.
#[derive(Debug)]
pub struct NullChartBackend {
    available: bool,
    next_handle: u64,
    live: IndexMap<ChartHandle, LiveChart>,
    pub init_count: usize,
    pub dispose_count: usize,
}

impl Default for NullChartBackend {
    fn default() -> Self {
        Self {
            available: true,
            next_handle: 0,
            live: IndexMap::new(),
            init_count: 0,
            dispose_count: 0,
        }
    }
}

impl NullChartBackend {
    /// A backend whose capability check fails, as when the chart library is not loaded.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn live_on(&self, node: NodeId) -> Option<(ChartHandle, &LiveChart)> {
        self.live
            .iter()
            .find(|(_, chart)| chart.node == node)
            .map(|(handle, chart)| (*handle, chart))
    }

    #[must_use]
    pub fn chart(&self, handle: ChartHandle) -> Option<&LiveChart> {
        self.live.get(&handle)
    }

    fn live_mut(&mut self, handle: ChartHandle) -> DeckResult<&mut LiveChart> {
        self.live.get_mut(&handle).ok_or_else(|| {
            DeckError::ChartBackend(format!("chart handle {} is not live", handle.0))
        })
    }
}

impl ChartBackend for NullChartBackend {
    fn is_available(&self) -> bool {
        self.available
    }

    fn init(&mut self, node: NodeId) -> DeckResult<ChartHandle> {
        if !self.available {
            return Err(DeckError::ChartBackend(
                "charting capability unavailable".to_owned(),
            ));
        }
        if self.live_on(node).is_some() {
            return Err(DeckError::ChartBackend(format!(
                "node {} already has a live render context",
                node.index()
            )));
        }
        self.next_handle += 1;
        let handle = ChartHandle(self.next_handle);
        self.live.insert(
            handle,
            LiveChart {
                node,
                spec: None,
                option_updates: 0,
                resize_count: 0,
            },
        );
        self.init_count += 1;
        Ok(handle)
    }

    fn set_option(
        &mut self,
        handle: ChartHandle,
        spec: &ChartSpec,
        merge: OptionMerge,
    ) -> DeckResult<()> {
        spec.validate()?;
        let chart = self.live_mut(handle)?;
        if merge == OptionMerge::Merge {
            let compatible = chart
                .spec
                .as_ref()
                .is_some_and(|current| current.shape() == spec.shape());
            if !compatible {
                return Err(DeckError::ChartBackend(
                    "merge update requires an identical chart shape".to_owned(),
                ));
            }
        }
        chart.spec = Some(spec.clone());
        chart.option_updates += 1;
        Ok(())
    }

    fn resize(&mut self, handle: ChartHandle) -> DeckResult<()> {
        self.live_mut(handle)?.resize_count += 1;
        Ok(())
    }

    fn dispose(&mut self, handle: ChartHandle) -> DeckResult<()> {
        if self.live.shift_remove(&handle).is_none() {
            return Err(DeckError::ChartBackend(format!(
                "chart handle {} is not live",
                handle.0
            )));
        }
        self.dispose_count += 1;
        Ok(())
    }
}
