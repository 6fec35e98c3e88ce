use std::time::Duration;

use tracing::trace;

use crate::api::{ActionTag, PageContext, PageController, PageEvent};
use crate::core::{Missing, Mounted, NodeId, Sandbox};
use crate::extensions::DeckSignal;

pub const SIDEBAR_ITEM_CLASS: &str = "sidebar-item";
pub const CHART_WRAPPER_ID: &str = "chart-22-wrapper";
pub const BAR_CLASS: &str = "bar";
pub const ACTIVE_CLASS: &str = "active";

const SIDEBAR_ACTION: ActionTag = ActionTag(0);
const BAR_ACTION: ActionTag = ActionTag(1);
const SIDEBAR_PULSE: Duration = Duration::from_millis(150);
const BAR_PULSE: Duration = Duration::from_millis(200);
const HOVER_COLOR: &str = "#E07A5F";
const REST_COLOR: &str = "#3D405B";

/// Static HTML bar chart next to a selectable sidebar. Both report their
/// activations as document signals.
pub struct SidebarChartPage {
    container_id: String,
    items: Vec<NodeId>,
    bars: Vec<NodeId>,
}

impl SidebarChartPage {
    #[must_use]
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            items: Vec::new(),
            bars: Vec::new(),
        }
    }

    fn select_item(&self, cx: &mut PageContext<'_>, node: NodeId) {
        let Some(index) = self.items.iter().position(|item| *item == node) else {
            return;
        };
        let dom = cx.dom();
        for item in &self.items {
            dom.toggle_class(*item, ACTIVE_CLASS, *item == node);
        }
        let text = dom.text(node).unwrap_or_default().trim().to_owned();
        pulse(cx, node, "scale(0.95)", SIDEBAR_PULSE);
        cx.emit(DeckSignal::SidebarItemChanged { index, text });
    }

    fn click_bar(&self, cx: &mut PageContext<'_>, node: NodeId) {
        let Some(index) = self.bars.iter().position(|bar| *bar == node) else {
            return;
        };
        let dom = cx.dom_ref();
        let Some(value) = dom.first_class_in(node, "bar-value") else {
            return;
        };
        let Some(label) = dom
            .closest_with_class(node, "bar-group")
            .and_then(|group| dom.first_class_in(group, "group-label"))
        else {
            return;
        };
        let value = dom.text(value).unwrap_or_default().trim().to_owned();
        let label = dom.text(label).unwrap_or_default().trim().to_owned();
        pulse(cx, node, "scale(1.05)", BAR_PULSE);
        cx.emit(DeckSignal::ChartBarClicked {
            index,
            label,
            value,
        });
    }
}

/// Applies a transient transform that clears itself after `hold`.
fn pulse(cx: &mut PageContext<'_>, node: NodeId, transform: &str, hold: Duration) {
    cx.dom().set_style(node, "transform", transform);
    cx.timers().after(None, hold, move |dom| {
        dom.remove_style(node, "transform");
    });
}

fn highlight(dom: &mut Sandbox<'_>, bar: NodeId, on: bool) {
    let value = dom.first_class_in(bar, "bar-value");
    if on {
        dom.set_style(bar, "background-color", HOVER_COLOR);
        dom.set_style(bar, "transition", "background-color 0.3s ease");
        if let Some(value) = value {
            dom.set_style(value, "font-weight", "bold");
            dom.set_style(value, "color", HOVER_COLOR);
        }
    } else {
        dom.set_style(bar, "background-color", REST_COLOR);
        if let Some(value) = value {
            dom.remove_style(value, "font-weight");
            dom.remove_style(value, "color");
        }
    }
}

impl PageController for SidebarChartPage {
    fn container_id(&self) -> &str {
        &self.container_id
    }

    fn mount(&mut self, cx: &mut PageContext<'_>) -> Mounted {
        let dom = cx.dom_ref();
        let items = dom.require_class(SIDEBAR_ITEM_CLASS)?;
        let wrapper = dom.require_id(CHART_WRAPPER_ID)?;
        let bars = dom.find_class_in(wrapper, BAR_CLASS);
        if bars.is_empty() {
            return Err(Missing::element(format!(
                "#{CHART_WRAPPER_ID} .{BAR_CLASS}"
            )));
        }

        let dom = cx.dom();
        for node in items.iter().chain(&bars) {
            dom.set_attr(*node, "tabindex", "0");
        }
        for item in &items {
            cx.bind_click(*item, SIDEBAR_ACTION);
        }
        for bar in &bars {
            cx.bind_click(*bar, BAR_ACTION);
            cx.bind_hover(*bar, BAR_ACTION);
        }
        trace!(items = items.len(), bars = bars.len(), "sidebar chart bound");
        self.items = items;
        self.bars = bars;
        Ok(())
    }

    fn on_event(&mut self, cx: &mut PageContext<'_>, event: PageEvent) {
        match event {
            PageEvent::Click {
                node,
                action: SIDEBAR_ACTION,
            } => self.select_item(cx, node),
            PageEvent::Click {
                node,
                action: BAR_ACTION,
            } => self.click_bar(cx, node),
            PageEvent::Hover { node, entered, .. } => highlight(cx.dom(), node, entered),
            _ => {}
        }
    }
}
