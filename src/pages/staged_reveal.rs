use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::{AnimationSequence, CountUp, TimerGroup, TimerToken};
use crate::api::{PageContext, PageController, PageEvent};
use crate::chart::{LabeledValue, bar_extents, css_percent, ratio_percent, scale_to_max};
use crate::core::{Element, Missing, Mounted, NodeId, Sandbox};

const START: TimerToken = TimerToken(0);
const START_DELAY: Duration = Duration::from_millis(100);
const COUNT_DURATION: Duration = Duration::from_millis(1_200);
const COLUMN_STAGGER: Duration = Duration::from_millis(80);
const ROW_STAGGER: Duration = Duration::from_millis(120);

/// One column of the vertical chart: a total with a highlighted share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareColumn {
    pub label: String,
    pub total: i64,
    pub highlight: i64,
}

impl ShareColumn {
    #[must_use]
    pub fn new(label: impl Into<String>, total: i64, highlight: i64) -> Self {
        Self {
            label: label.into(),
            total,
            highlight,
        }
    }
}

/// Reimbursement catalog size per year, with the traditional-medicine share.
#[must_use]
pub fn catalog_growth() -> Vec<ShareColumn> {
    [
        (2000, 1488, 913),
        (2009, 2127, 987),
        (2017, 2535, 1238),
        (2019, 2643, 1321),
        (2020, 2800, 1374),
        (2021, 2860, 1374),
        (2022, 2967, 1381),
        (2023, 3088, 1390),
        (2024, 3159, 1394),
    ]
    .into_iter()
    .map(|(year, total, highlight)| ShareColumn::new(year.to_string(), total, highlight))
    .collect()
}

/// Newly listed drugs by therapeutic class.
#[must_use]
pub fn new_listings_by_class() -> Vec<LabeledValue> {
    vec![
        LabeledValue::new("Antineoplastics and immunomodulators", 29.0),
        LabeledValue::new("Nervous system", 15.0),
        LabeledValue::new("Alimentary tract and metabolism", 15.0),
        LabeledValue::new("Systemic anti-infectives", 7.0),
        LabeledValue::new("Cardiovascular system", 7.0),
        LabeledValue::new("Respiratory system", 5.0),
        LabeledValue::new("Blood and blood-forming organs", 5.0),
    ]
}

#[derive(Debug, Clone)]
struct StageNodes {
    keywords: [NodeId; 3],
    columns_panel: NodeId,
    columns_host: NodeId,
    rows_panel: NodeId,
    rows_host: NodeId,
    summary: NodeId,
    conclusion: NodeId,
}

impl StageNodes {
    fn locate(dom: &Sandbox<'_>) -> Result<Self, Missing> {
        let columns_panel = dom.require_id("chart1")?;
        let rows_panel = dom.require_id("chart2")?;
        Ok(Self {
            keywords: [
                dom.require_id("st-patient")?,
                dom.require_id("st-industry")?,
                dom.require_id("st-society")?,
            ],
            columns_panel,
            columns_host: dom.require_class_in(columns_panel, "bar-chart-vertical")?,
            rows_panel,
            rows_host: dom.require_class_in(rows_panel, "bar-chart-horizontal")?,
            summary: dom.require_id("summary")?,
            conclusion: dom.require_id("conclusion")?,
        })
    }
}

struct BuiltBar {
    bar: NodeId,
    value: NodeId,
    target: i64,
}

/// Narrative page that reveals keywords, two bar charts and a conclusion on
/// a fixed timeline shortly after it mounts.
pub struct StagedRevealPage {
    container_id: String,
    columns: Vec<ShareColumn>,
    rows: Vec<LabeledValue>,
    sequence: Option<AnimationSequence>,
    start: Option<TimerGroup>,
}

impl StagedRevealPage {
    #[must_use]
    pub fn new(
        container_id: impl Into<String>,
        columns: Vec<ShareColumn>,
        rows: Vec<LabeledValue>,
    ) -> Self {
        Self {
            container_id: container_id.into(),
            columns,
            rows,
            sequence: None,
            start: None,
        }
    }

    fn build_columns(&self, dom: &mut Sandbox<'_>, host: NodeId) -> Vec<BuiltBar> {
        dom.clear_children(host);
        let totals: Vec<f64> = self.columns.iter().map(|c| c.total as f64).collect();
        let heights = scale_to_max(&totals);
        let mut built = Vec::with_capacity(self.columns.len());
        for (column, height) in self.columns.iter().zip(heights) {
            let share = ratio_percent(column.highlight as f64, column.total as f64).unwrap_or(0.0);
            let Some(group) = dom.append(host, Element::new("div").with_class("bar-group")) else {
                continue;
            };
            let bar = dom.append(
                group,
                Element::new("div")
                    .with_class("bar")
                    .with_style("height", "0%")
                    .with_data("height", css_percent(height)),
            );
            dom.append(
                group,
                Element::new("div")
                    .with_class("bar-label")
                    .with_text(column.label.clone()),
            );
            let Some(bar) = bar else {
                continue;
            };
            dom.append(
                bar,
                Element::new("div")
                    .with_class("bar-tcm")
                    .with_style("height", css_percent(share)),
            );
            if let Some(value) = dom.append(
                bar,
                Element::new("div")
                    .with_class("bar-value")
                    .with_data("value", column.total.to_string())
                    .with_text("0"),
            ) {
                built.push(BuiltBar {
                    bar,
                    value,
                    target: column.total,
                });
            }
        }
        built
    }

    fn build_rows(&self, dom: &mut Sandbox<'_>, host: NodeId) -> Vec<(NodeId, BuiltBar)> {
        dom.clear_children(host);
        let mut built = Vec::with_capacity(self.rows.len());
        for extent in bar_extents(&self.rows) {
            let Some(row) = dom.append(host, Element::new("div").with_class("bar-row")) else {
                continue;
            };
            dom.append(
                row,
                Element::new("div")
                    .with_class("bar-row-label")
                    .with_text(extent.label.clone()),
            );
            let bar = dom
                .append(row, Element::new("div").with_class("bar-horizontal-wrapper"))
                .and_then(|wrapper| {
                    dom.append(
                        wrapper,
                        Element::new("div")
                            .with_class("bar-horizontal")
                            .with_style("width", "0%")
                            .with_data("width", css_percent(extent.percent)),
                    )
                });
            let Some(bar) = bar else {
                continue;
            };
            let target = extent.value as i64;
            if let Some(value) = dom.append(
                bar,
                Element::new("span")
                    .with_class("bar-horizontal-value")
                    .with_data("value", target.to_string())
                    .with_text("0"),
            ) {
                built.push((row, BuiltBar { bar, value, target }));
            }
        }
        built
    }
}

fn reveal(dom: &mut Sandbox<'_>, node: NodeId, dim: Option<NodeId>) {
    if let Some(dim) = dim {
        dom.add_class(dim, "is-dimmed");
    }
    dom.add_class(node, "is-visible");
}

fn apply_data_style(dom: &mut Sandbox<'_>, node: NodeId, key: &str, property: &str) {
    if let Some(value) = dom.data(node, key).map(str::to_owned) {
        dom.set_style(node, property, value);
    }
}

fn timeline(
    stage: &StageNodes,
    columns: &[BuiltBar],
    rows: &[(NodeId, BuiltBar)],
) -> AnimationSequence {
    let [patient, industry, society] = stage.keywords;
    let columns_panel = stage.columns_panel;
    let rows_panel = stage.rows_panel;
    let summary = stage.summary;
    let conclusion = stage.conclusion;

    let columns_start = Duration::from_millis(500);
    let rows_start = Duration::from_millis(1_900);
    let column_bars: Vec<NodeId> = columns.iter().map(|built| built.bar).collect();
    let row_nodes: Vec<NodeId> = rows.iter().map(|(row, _)| *row).collect();
    let row_bars: Vec<NodeId> = rows.iter().map(|(_, built)| built.bar).collect();

    let mut sequence = AnimationSequence::new()
        .at(Duration::from_millis(100), move |dom| reveal(dom, patient, None))
        .at(Duration::from_millis(200), move |dom| reveal(dom, industry, None))
        .at(Duration::from_millis(300), move |dom| reveal(dom, society, None))
        .at(columns_start, move |dom| reveal(dom, columns_panel, None))
        .stagger(columns_start, COLUMN_STAGGER, &column_bars, |dom, bar| {
            apply_data_style(dom, bar, "height", "height");
        })
        .at(rows_start, move |dom| reveal(dom, rows_panel, Some(columns_panel)))
        .stagger(rows_start, ROW_STAGGER, &row_nodes, |dom, row| {
            dom.add_class(row, "is-visible");
        })
        .stagger(rows_start, ROW_STAGGER, &row_bars, |dom, bar| {
            apply_data_style(dom, bar, "width", "width");
        })
        .at(Duration::from_millis(2_200), move |dom| {
            reveal(dom, summary, Some(rows_panel));
        })
        .at(Duration::from_millis(2_400), move |dom| {
            reveal(dom, conclusion, Some(summary));
        });

    for (i, built) in columns.iter().enumerate() {
        let at = columns_start + COLUMN_STAGGER * i as u32;
        let count = CountUp::new(0, built.target, COUNT_DURATION);
        sequence = sequence.count_up_at(at, built.value, count);
    }
    for (i, (_, built)) in rows.iter().enumerate() {
        let at = rows_start + ROW_STAGGER * i as u32;
        let count = CountUp::new(0, built.target, COUNT_DURATION);
        sequence = sequence.count_up_at(at, built.value, count);
    }

    let revealed = [patient, industry, society, columns_panel, rows_panel, summary, conclusion];
    sequence.on_reset(move |dom| {
        for node in revealed {
            dom.remove_class(node, "is-visible");
            dom.remove_class(node, "is-dimmed");
        }
    })
}

impl PageController for StagedRevealPage {
    fn container_id(&self) -> &str {
        &self.container_id
    }

    fn mount(&mut self, cx: &mut PageContext<'_>) -> Mounted {
        let stage = StageNodes::locate(cx.dom_ref())?;
        if let Some(previous) = self.sequence.as_mut() {
            previous.reset(cx);
        }
        let dom = cx.dom();
        let columns = self.build_columns(dom, stage.columns_host);
        let rows = self.build_rows(dom, stage.rows_host);
        self.sequence = Some(timeline(&stage, &columns, &rows));

        let timers = cx.timers();
        let start = *self.start.get_or_insert_with(|| timers.group());
        timers.cancel_group(start);
        timers.wake_after(Some(start), START_DELAY, START);
        Ok(())
    }

    fn on_event(&mut self, cx: &mut PageContext<'_>, event: PageEvent) {
        if event == PageEvent::Timer(START) {
            if let Some(sequence) = self.sequence.as_mut() {
                sequence.play(cx);
            }
        }
    }

    fn teardown(&mut self, cx: &mut PageContext<'_>) {
        if let Some(start) = self.start {
            cx.timers().cancel_group(start);
        }
        if let Some(sequence) = self.sequence.as_mut() {
            sequence.cancel(cx);
        }
    }
}
