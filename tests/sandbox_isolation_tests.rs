use std::time::Duration;

use deck_rs::api::{ActionTag, Deck, DeckConfig, PageContext, PageController, PageEvent};
use deck_rs::chart::NullChartBackend;
use deck_rs::core::{Document, Element, Mounted, NodeId};
use deck_rs::extensions::DeckSignal;
use deck_rs::pages::{StagedRevealPage, catalog_growth, new_listings_by_class};

/// Tries to reach a node of another page through every mutation path.
struct IntruderPage {
    foreign: NodeId,
}

impl PageController for IntruderPage {
    fn container_id(&self) -> &str {
        "intruder"
    }

    fn mount(&mut self, cx: &mut PageContext<'_>) -> Mounted {
        let foreign = self.foreign;
        let dom = cx.dom();
        assert!(!dom.contains(foreign));
        assert!(!dom.set_text(foreign, "owned"));
        assert!(!dom.add_class(foreign, "owned"));
        assert!(!dom.set_style(foreign, "opacity", "0"));
        assert!(dom.append(foreign, Element::new("div")).is_none());
        assert_eq!(dom.clear_children(foreign), 0);
        assert!(dom.element(foreign).is_none());
        assert!(!cx.bind_click(foreign, ActionTag(1)));
        cx.timers().after(None, Duration::from_millis(10), move |dom| {
            dom.set_text(foreign, "late");
        });
        Ok(())
    }
}

fn staged_markup(doc: &mut Document, id: &str) -> NodeId {
    let root = doc.root();
    let page = doc
        .append(root, Element::new("section").with_id(id))
        .expect("append page");
    for keyword in ["st-patient", "st-industry", "st-society"] {
        doc.append(page, Element::new("span").with_id(keyword))
            .expect("append keyword");
    }
    let chart1 = doc
        .append(page, Element::new("div").with_id("chart1"))
        .expect("append chart1");
    doc.append(chart1, Element::new("div").with_class("bar-chart-vertical"))
        .expect("append vertical host");
    let chart2 = doc
        .append(page, Element::new("div").with_id("chart2"))
        .expect("append chart2");
    doc.append(chart2, Element::new("div").with_class("bar-chart-horizontal"))
        .expect("append horizontal host");
    doc.append(page, Element::new("p").with_id("summary"))
        .expect("append summary");
    doc.append(page, Element::new("p").with_id("conclusion"))
        .expect("append conclusion");
    page
}

fn bystander(doc: &mut Document) -> (NodeId, NodeId) {
    let root = doc.root();
    let page = doc
        .append(
            root,
            Element::new("section")
                .with_id("bystander")
                .with_class("page")
                .with_style("opacity", "1"),
        )
        .expect("append bystander");
    let label = doc
        .append(
            page,
            Element::new("h2")
                .with_id("summary")
                .with_attr("data-value", "3159")
                .with_text("Untouched"),
        )
        .expect("append label");
    (page, label)
}

fn subtree_json(deck: &Deck<NullChartBackend>, node: NodeId) -> String {
    deck.document()
        .snapshot(node)
        .expect("snapshot")
        .to_json()
        .expect("json")
}

#[test]
fn full_page_lifecycle_leaves_sibling_subtree_byte_identical() {
    let mut deck = Deck::new(NullChartBackend::default(), DeckConfig::default()).expect("deck");
    staged_markup(deck.document_mut(), "page-staged");
    let (bystander_page, _) = bystander(deck.document_mut());
    let before = subtree_json(&deck, bystander_page);

    deck.register(Box::new(StagedRevealPage::new(
        "page-staged",
        catalog_growth(),
        new_listings_by_class(),
    )))
    .expect("register");
    deck.boot();
    deck.advance(Duration::from_millis(1_000));
    deck.emit(DeckSignal::PageChanged);
    deck.advance(Duration::from_secs(5));
    assert!(deck.unmount("page-staged"));
    deck.advance(Duration::from_secs(1));

    assert_eq!(subtree_json(&deck, bystander_page), before);
}

#[test]
fn duplicate_ids_in_other_pages_do_not_leak_into_lookups() {
    let mut deck = Deck::new(NullChartBackend::default(), DeckConfig::default()).expect("deck");
    let (_, foreign_summary) = bystander(deck.document_mut());
    staged_markup(deck.document_mut(), "page-staged");

    deck.register(Box::new(StagedRevealPage::new(
        "page-staged",
        catalog_growth(),
        new_listings_by_class(),
    )))
    .expect("register");
    deck.boot();
    deck.advance(Duration::from_secs(5));

    let foreign = deck.document().element(foreign_summary).expect("summary");
    assert!(foreign.classes.is_empty());
}

#[test]
fn out_of_container_mutations_are_refused() {
    let mut deck = Deck::new(NullChartBackend::default(), DeckConfig::default()).expect("deck");
    let (bystander_page, label) = bystander(deck.document_mut());
    let root = deck.document().root();
    deck.document_mut()
        .append(root, Element::new("section").with_id("intruder"))
        .expect("append intruder");
    let before = subtree_json(&deck, bystander_page);

    deck.register(Box::new(IntruderPage { foreign: label }))
        .expect("register");
    deck.boot();
    deck.advance(Duration::from_millis(50));

    assert_eq!(subtree_json(&deck, bystander_page), before);
    assert!(deck.bindings().is_empty());
    assert!(!deck.click(label));
}

#[test]
fn page_events_only_reach_their_owner() {
    struct Probe {
        id: &'static str,
        events: std::rc::Rc<std::cell::RefCell<Vec<(&'static str, PageEvent)>>>,
    }

    impl PageController for Probe {
        fn container_id(&self) -> &str {
            self.id
        }

        fn mount(&mut self, cx: &mut PageContext<'_>) -> Mounted {
            let root = cx.dom_ref().root();
            cx.bind_click(root, ActionTag(0));
            Ok(())
        }

        fn on_event(&mut self, _cx: &mut PageContext<'_>, event: PageEvent) {
            self.events.borrow_mut().push((self.id, event));
        }
    }

    let mut deck = Deck::new(NullChartBackend::default(), DeckConfig::default()).expect("deck");
    let root = deck.document().root();
    let a = deck
        .document_mut()
        .append(root, Element::new("section").with_id("a"))
        .expect("append a");
    deck.document_mut()
        .append(root, Element::new("section").with_id("b"))
        .expect("append b");
    let events = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    for id in ["a", "b"] {
        deck.register(Box::new(Probe {
            id,
            events: events.clone(),
        }))
        .expect("register");
    }
    deck.boot();

    assert!(deck.click(a));
    assert_eq!(
        events.borrow().as_slice(),
        &[(
            "a",
            PageEvent::Click {
                node: a,
                action: ActionTag(0)
            }
        )]
    );
}
