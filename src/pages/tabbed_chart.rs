use std::time::Duration;

use tracing::{debug, warn};

use crate::animation::{TimerGroup, TimerToken};
use crate::api::{ActionTag, PageContext, PageController, PageEvent, PageOptions, ResizePolicy};
use crate::chart::{Axis, ChartSlot, ChartSpec, RenderOutcome, Series, SeriesKind};
use crate::core::{Mounted, NodeId};

pub const ACTIVE_CLASS: &str = "active";
const FADE: Duration = Duration::from_millis(300);

/// One tab and the chart it shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub tab_id: String,
    pub spec: ChartSpec,
}

impl ChartView {
    #[must_use]
    pub fn new(tab_id: impl Into<String>, spec: ChartSpec) -> Self {
        Self {
            tab_id: tab_id.into(),
            spec,
        }
    }
}

/// Hospital-market sales share by procurement batch (ring chart).
#[must_use]
pub fn batch_share_spec() -> ChartSpec {
    let labels = [
        "Batch 1", "Batch 2", "Batch 3", "Batch 4", "Batch 5", "Batch 6", "Batch 7", "Batch 8",
        "Batch 9", "Not procured",
    ];
    let shares = vec![6.1, 2.8, 3.8, 3.2, 6.9, 2.0, 5.5, 4.5, 2.0, 63.1];
    ChartSpec::new()
        .with_title("Pre-procurement hospital sales by batch")
        .with_subtitle("All hospitals")
        .with_series(Series::new("Sales share", SeriesKind::Pie, shares).with_labels(labels))
}

/// Hospital-channel sales of procured molecules, batch by batch (billion CNY).
#[must_use]
pub fn batch_sales_spec() -> ChartSpec {
    ChartSpec::new()
        .with_title("Hospital-channel sales of procured molecules")
        .with_x_axis(Axis::category([
            "2019", "Batch 1", "Batch 2", "Batch 3", "Batch 4", "Batch 5", "Batch 6", "Batch 7",
            "2023 / Batch 8",
        ]))
        .with_y_axis(Axis::value().with_name("Sales (100M CNY)"))
        .with_series(Series::new(
            "Sales",
            SeriesKind::Bar,
            vec![
                4623.4, 4165.0, 3913.8, 3641.8, 3433.5, 3106.6, 2992.2, 2617.8, 2547.6,
            ],
        ))
}

/// One chart node switched between views by tab buttons.
///
/// A switch fades the node out, then disposes the live chart and creates a
/// fresh one for the new view. Clicking the active tab again only refreshes
/// its options in place.
pub struct TabbedChartPage {
    container_id: String,
    chart_id: String,
    views: Vec<ChartView>,
    resize: ResizePolicy,
    slot: Option<ChartSlot>,
    tabs: Vec<NodeId>,
    current: Option<usize>,
    pending: Option<usize>,
    fade: Option<TimerGroup>,
}

impl TabbedChartPage {
    #[must_use]
    pub fn new(
        container_id: impl Into<String>,
        chart_id: impl Into<String>,
        views: Vec<ChartView>,
    ) -> Self {
        Self {
            container_id: container_id.into(),
            chart_id: chart_id.into(),
            views,
            resize: ResizePolicy::WhenVisible,
            slot: None,
            tabs: Vec::new(),
            current: None,
            pending: None,
            fade: None,
        }
    }

    #[must_use]
    pub fn with_resize(mut self, resize: ResizePolicy) -> Self {
        self.resize = resize;
        self
    }

    #[must_use]
    pub fn current_view(&self) -> Option<usize> {
        self.current
    }

    #[must_use]
    pub fn slot(&self) -> Option<&ChartSlot> {
        self.slot.as_ref()
    }

    /// Starts the fade-out; the chart is rebuilt when the fade wake-up fires.
    pub fn switch_to(&mut self, cx: &mut PageContext<'_>, index: usize) {
        let Some(slot) = self.slot.as_ref() else {
            return;
        };
        if index >= self.views.len() {
            return;
        }
        let node = slot.node();
        cx.dom().set_style(node, "opacity", "0");
        let timers = cx.timers();
        let fade = *self.fade.get_or_insert_with(|| timers.group());
        timers.cancel_group(fade);
        timers.wake_after(Some(fade), FADE, TimerToken(index as u32));
        self.pending = Some(index);
    }

    fn show(&mut self, cx: &mut PageContext<'_>, index: usize) {
        let (Some(slot), Some(view)) = (self.slot.as_mut(), self.views.get(index)) else {
            return;
        };
        match slot.render(cx, &view.spec) {
            Ok(RenderOutcome::Skipped) => {}
            Ok(_) => debug!(page = cx.key().0, view = index, "chart view rendered"),
            Err(err) => warn!(page = cx.key().0, view = index, error = %err, "chart view failed"),
        }
        let node = slot.node();
        let dom = cx.dom();
        for (i, tab) in self.tabs.iter().enumerate() {
            dom.toggle_class(*tab, ACTIVE_CLASS, i == index);
        }
        dom.set_style(node, "opacity", "1");
        self.current = Some(index);
        self.pending = None;
    }

    fn refresh(&mut self, cx: &mut PageContext<'_>, index: usize) {
        let (Some(slot), Some(view)) = (self.slot.as_mut(), self.views.get(index)) else {
            return;
        };
        if let Err(err) = slot.update(cx, &view.spec) {
            warn!(page = cx.key().0, view = index, error = %err, "chart refresh failed");
        }
    }
}

impl PageController for TabbedChartPage {
    fn container_id(&self) -> &str {
        &self.container_id
    }

    fn options(&self) -> PageOptions {
        PageOptions::new().with_resize(self.resize)
    }

    fn mount(&mut self, cx: &mut PageContext<'_>) -> Mounted {
        let dom = cx.dom();
        let chart = dom.require_id(&self.chart_id)?;
        let tabs = self
            .views
            .iter()
            .map(|view| dom.require_id(&view.tab_id))
            .collect::<Result<Vec<_>, _>>()?;

        for (index, tab) in tabs.iter().enumerate() {
            cx.bind_click(*tab, ActionTag(index as u32));
        }
        if self.slot.as_ref().map(ChartSlot::node) != Some(chart) {
            if let Some(mut previous) = self.slot.take() {
                if let Err(err) = previous.dispose(cx) {
                    warn!(page = cx.key().0, error = %err, "stale chart dispose failed");
                }
            }
            self.slot = Some(ChartSlot::new(chart));
        }
        self.tabs = tabs;
        self.switch_to(cx, 0);
        Ok(())
    }

    fn on_event(&mut self, cx: &mut PageContext<'_>, event: PageEvent) {
        match event {
            PageEvent::Click { action, .. } => {
                let index = action.0 as usize;
                match self.pending {
                    Some(pending) if pending == index => {}
                    None if self.current == Some(index) => self.refresh(cx, index),
                    _ => self.switch_to(cx, index),
                }
            }
            PageEvent::Timer(token) => self.show(cx, token.0 as usize),
            _ => {}
        }
    }

    fn on_resize(&mut self, cx: &mut PageContext<'_>) {
        if let Some(slot) = self.slot.as_mut() {
            if let Err(err) = slot.resize(cx) {
                warn!(page = cx.key().0, error = %err, "chart resize failed");
            }
        }
    }

    fn teardown(&mut self, cx: &mut PageContext<'_>) {
        if let Some(fade) = self.fade {
            cx.timers().cancel_group(fade);
        }
        if let Some(slot) = self.slot.as_mut() {
            if let Err(err) = slot.dispose(cx) {
                warn!(page = cx.key().0, error = %err, "chart dispose failed");
            }
        }
        self.current = None;
        self.pending = None;
    }
}
