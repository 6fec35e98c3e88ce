use std::time::Duration;

use deck_rs::api::{Deck, DeckConfig, PageStatus, ResizePolicy};
use deck_rs::chart::{NullChartBackend, SeriesKind};
use deck_rs::core::{Element, NodeId, Viewport};
use deck_rs::extensions::DeckSignal;
use deck_rs::pages::{ChartView, TabbedChartPage, batch_sales_spec, batch_share_spec};

const FADE: Duration = Duration::from_millis(300);

struct Tabs {
    deck: Deck<NullChartBackend>,
    chart: NodeId,
    tabs: [NodeId; 2],
}

fn tabs(backend: NullChartBackend, resize: ResizePolicy) -> Tabs {
    let mut deck = Deck::new(backend, DeckConfig::default()).expect("deck");
    let doc = deck.document_mut();
    let root = doc.root();
    let page = doc
        .append(root, Element::new("section").with_id("page-batches"))
        .expect("append page");
    let share = doc
        .append(page, Element::new("button").with_id("tab-share"))
        .expect("append share tab");
    let sales = doc
        .append(page, Element::new("button").with_id("tab-sales"))
        .expect("append sales tab");
    let chart = doc
        .append(page, Element::new("div").with_id("batch-chart"))
        .expect("append chart");

    let views = vec![
        ChartView::new("tab-share", batch_share_spec()),
        ChartView::new("tab-sales", batch_sales_spec()),
    ];
    deck.register(Box::new(
        TabbedChartPage::new("page-batches", "batch-chart", views).with_resize(resize),
    ))
    .expect("register");
    deck.boot();
    Tabs {
        deck,
        chart,
        tabs: [share, sales],
    }
}

fn live_kind(t: &Tabs) -> Option<SeriesKind> {
    let (_, chart) = t.deck.backend().live_on(t.chart)?;
    chart
        .spec
        .as_ref()
        .and_then(|spec| spec.series.first())
        .map(|series| series.kind)
}

fn opacity(t: &Tabs) -> Option<String> {
    t.deck
        .document()
        .element(t.chart)
        .and_then(|element| element.styles.get("opacity").cloned())
}

#[test]
fn first_view_renders_after_the_fade() {
    let mut t = tabs(NullChartBackend::default(), ResizePolicy::WhenVisible);
    assert_eq!(opacity(&t).as_deref(), Some("0"));
    assert_eq!(t.deck.backend().live_count(), 0);

    t.deck.advance(FADE);
    assert_eq!(live_kind(&t), Some(SeriesKind::Pie));
    assert_eq!(opacity(&t).as_deref(), Some("1"));
    let share_tab = t.deck.document().element(t.tabs[0]).expect("tab");
    assert!(share_tab.has_class("active"));
}

#[test]
fn switching_views_disposes_before_reinitializing() {
    let mut t = tabs(NullChartBackend::default(), ResizePolicy::WhenVisible);
    t.deck.advance(FADE);

    assert!(t.deck.click(t.tabs[1]));
    t.deck.advance(FADE);
    assert_eq!(live_kind(&t), Some(SeriesKind::Bar));
    let backend = t.deck.backend();
    assert_eq!(backend.live_count(), 1);
    assert_eq!(backend.init_count, 2);
    assert_eq!(backend.dispose_count, 1);

    let sales_tab = t.deck.document().element(t.tabs[1]).expect("tab");
    assert!(sales_tab.has_class("active"));
    let share_tab = t.deck.document().element(t.tabs[0]).expect("tab");
    assert!(!share_tab.has_class("active"));
}

#[test]
fn rapid_tab_switching_renders_only_the_last_choice() {
    let mut t = tabs(NullChartBackend::default(), ResizePolicy::WhenVisible);
    t.deck.advance(FADE);

    t.deck.click(t.tabs[1]);
    t.deck.advance(Duration::from_millis(100));
    t.deck.click(t.tabs[0]);
    t.deck.advance(FADE);

    assert_eq!(live_kind(&t), Some(SeriesKind::Pie));
    assert_eq!(t.deck.backend().init_count, 2);
    assert_eq!(t.deck.backend().live_count(), 1);
}

#[test]
fn clicking_the_active_tab_merges_options_in_place() {
    let mut t = tabs(NullChartBackend::default(), ResizePolicy::WhenVisible);
    t.deck.advance(FADE);
    let (handle, before) = t.deck.backend().live_on(t.chart).expect("live chart");
    let updates = before.option_updates;

    t.deck.click(t.tabs[0]);
    let (same, after) = t.deck.backend().live_on(t.chart).expect("live chart");
    assert_eq!(handle, same);
    assert_eq!(after.option_updates, updates + 1);
    assert_eq!(t.deck.backend().init_count, 1);
}

#[test]
fn page_changed_remount_never_leaks_render_contexts() {
    let mut t = tabs(NullChartBackend::default(), ResizePolicy::WhenVisible);
    t.deck.advance(FADE);
    t.deck.emit(DeckSignal::PageChanged);
    t.deck.advance(FADE);
    t.deck.emit(DeckSignal::PageChanged);
    t.deck.advance(FADE);

    assert_eq!(t.deck.backend().live_count(), 1);
    assert_eq!(
        t.deck.backend().init_count - t.deck.backend().dispose_count,
        1
    );
}

#[test]
fn unavailable_backend_skips_rendering_without_failing_the_page() {
    let mut t = tabs(NullChartBackend::unavailable(), ResizePolicy::WhenVisible);
    t.deck.advance(FADE);
    assert_eq!(t.deck.page_status("page-batches"), Some(PageStatus::Mounted));
    assert_eq!(t.deck.backend().live_count(), 0);
    assert_eq!(opacity(&t).as_deref(), Some("1"));
}

#[test]
fn unmount_disposes_the_live_chart() {
    let mut t = tabs(NullChartBackend::default(), ResizePolicy::WhenVisible);
    t.deck.advance(FADE);
    assert!(t.deck.unmount("page-batches"));
    assert_eq!(t.deck.backend().live_count(), 0);
    assert_eq!(t.deck.backend().dispose_count, 1);
}

#[test]
fn resize_is_debounced_and_gated_by_visibility() {
    let mut t = tabs(NullChartBackend::default(), ResizePolicy::WhenVisible);
    t.deck.advance(FADE);

    t.deck.resize(Viewport::new(1280, 720)).expect("resize");
    t.deck.advance(Duration::from_millis(300));
    let (_, chart) = t.deck.backend().live_on(t.chart).expect("live chart");
    assert_eq!(chart.resize_count, 0);

    t.deck.set_intersection("page-batches", 0.7);
    let (_, chart) = t.deck.backend().live_on(t.chart).expect("live chart");
    assert_eq!(chart.resize_count, 1);

    for _ in 0..3 {
        t.deck.resize(Viewport::new(1024, 768)).expect("resize");
        t.deck.advance(Duration::from_millis(100));
    }
    let (_, chart) = t.deck.backend().live_on(t.chart).expect("live chart");
    assert_eq!(chart.resize_count, 1);

    t.deck.advance(Duration::from_millis(150));
    let (_, chart) = t.deck.backend().live_on(t.chart).expect("live chart");
    assert_eq!(chart.resize_count, 2);
    assert_eq!(t.deck.viewport(), Viewport::new(1024, 768));
}

#[test]
fn resize_missed_while_hidden_is_applied_once_on_entry() {
    let mut t = tabs(NullChartBackend::default(), ResizePolicy::WhenVisible);
    t.deck.advance(FADE);

    t.deck.set_intersection("page-batches", 0.7);
    t.deck.advance(Duration::from_millis(50));
    let (_, chart) = t.deck.backend().live_on(t.chart).expect("live chart");
    assert_eq!(chart.resize_count, 0);

    t.deck.set_intersection("page-batches", 0.0);
    t.deck.resize(Viewport::new(1280, 720)).expect("resize");
    t.deck.advance(Duration::from_millis(300));
    let (_, chart) = t.deck.backend().live_on(t.chart).expect("live chart");
    assert_eq!(chart.resize_count, 0);

    t.deck.set_intersection("page-batches", 0.7);
    t.deck.advance(Duration::from_millis(50));
    let (_, chart) = t.deck.backend().live_on(t.chart).expect("live chart");
    assert_eq!(chart.resize_count, 1);

    t.deck.set_intersection("page-batches", 0.0);
    t.deck.set_intersection("page-batches", 0.7);
    let (_, chart) = t.deck.backend().live_on(t.chart).expect("live chart");
    assert_eq!(chart.resize_count, 1);
}

#[test]
fn always_policy_resizes_hidden_pages() {
    let mut t = tabs(NullChartBackend::default(), ResizePolicy::Always);
    t.deck.advance(FADE);
    t.deck.resize(Viewport::new(800, 600)).expect("resize");
    t.deck.advance(Duration::from_millis(250));
    let (_, chart) = t.deck.backend().live_on(t.chart).expect("live chart");
    assert_eq!(chart.resize_count, 1);
}

#[test]
fn invalid_viewport_is_rejected() {
    let mut t = tabs(NullChartBackend::default(), ResizePolicy::Always);
    assert!(t.deck.resize(Viewport::new(0, 600)).is_err());
    assert_eq!(t.deck.viewport(), Viewport::default());
}
