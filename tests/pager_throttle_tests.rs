use std::time::Duration;

use deck_rs::api::{Deck, DeckConfig};
use deck_rs::chart::NullChartBackend;
use deck_rs::core::{Element, NodeId};
use deck_rs::interaction::{InputDisposition, Key};
use deck_rs::pages::ScenePagerPage;
use deck_rs::pages::fountain::PARTICLE_COUNT;

struct Pager {
    deck: Deck<NullChartBackend>,
    scenes: Vec<NodeId>,
    dots: Vec<NodeId>,
    hint: NodeId,
    bubble: NodeId,
    path: NodeId,
    fountain: NodeId,
}

fn pager(config: DeckConfig) -> Pager {
    let mut deck = Deck::new(NullChartBackend::default(), config).expect("deck");
    let doc = deck.document_mut();
    let root = doc.root();
    let page = doc
        .append(root, Element::new("section").with_id("page-scenes"))
        .expect("append page");
    let scenes: Vec<NodeId> = (0..3)
        .map(|_| {
            doc.append(page, Element::new("div").with_class("scene"))
                .expect("append scene")
        })
        .collect();
    let finale = scenes[2];
    let bubble = doc
        .append(finale, Element::new("div").with_class("thought-bubble"))
        .expect("append bubble");
    let path = doc
        .append(finale, Element::new("svg").with_id("solution-path"))
        .expect("append path");
    let fountain = doc
        .append(finale, Element::new("div").with_id("thumbs-up-fountain"))
        .expect("append fountain");
    let pagination = doc
        .append(page, Element::new("nav").with_class("pagination"))
        .expect("append pagination");
    let hint = doc
        .append(page, Element::new("div").with_id("scroll-hint"))
        .expect("append hint");

    deck.register(Box::new(ScenePagerPage::new("page-scenes").with_finale(2)))
        .expect("register");
    deck.boot();
    deck.set_intersection("page-scenes", 1.0);
    let dots = deck.document().children(pagination).to_vec();
    Pager {
        deck,
        scenes,
        dots,
        hint,
        bubble,
        path,
        fountain,
    }
}

impl Pager {
    fn active(&self) -> Option<usize> {
        self.scenes.iter().position(|scene| self.has(*scene, "is-active"))
    }

    fn has(&self, node: NodeId, class: &str) -> bool {
        self.deck
            .document()
            .element(node)
            .is_some_and(|element| element.has_class(class))
    }
}

#[test]
fn mount_builds_one_dot_per_scene() {
    let p = pager(DeckConfig::default());
    assert_eq!(p.dots.len(), 3);
    assert!(p.has(p.dots[0], "is-active"));
    assert!(!p.has(p.dots[1], "is-active"));
    assert_eq!(p.active(), Some(0));
}

#[test]
fn two_inputs_inside_the_cooldown_advance_once() {
    let mut p = pager(DeckConfig::default());
    assert_eq!(p.deck.wheel(100.0), InputDisposition::Consumed);
    p.deck.advance(Duration::from_millis(50));
    assert_eq!(p.deck.wheel(100.0), InputDisposition::Consumed);
    assert_eq!(p.active(), Some(1));

    p.deck.advance(Duration::from_millis(950));
    assert_eq!(p.deck.key_down(Key::ArrowDown), InputDisposition::Consumed);
    assert_eq!(p.active(), Some(2));
}

#[test]
fn boundaries_release_input_to_native_scrolling() {
    let mut p = pager(DeckConfig::default().with_input_cooldown_ms(0));
    assert_eq!(p.deck.wheel(-100.0), InputDisposition::PassThrough);
    assert_eq!(p.active(), Some(0));

    p.deck.wheel(100.0);
    p.deck.wheel(100.0);
    assert_eq!(p.active(), Some(2));
    assert_eq!(p.deck.key_down(Key::PageDown), InputDisposition::PassThrough);
    assert_eq!(p.active(), Some(2));

    assert_eq!(p.deck.key_down(Key::ArrowUp), InputDisposition::Consumed);
    assert_eq!(p.active(), Some(1));
}

#[test]
fn scroll_hint_hides_after_the_first_scene() {
    let mut p = pager(DeckConfig::default());
    assert!(!p.has(p.hint, "hidden"));
    p.deck.wheel(100.0);
    assert!(p.has(p.hint, "hidden"));
    p.deck.advance(Duration::from_secs(1));
    p.deck.wheel(-100.0);
    assert!(!p.has(p.hint, "hidden"));
}

#[test]
fn dot_click_jumps_and_respects_the_cooldown() {
    let mut p = pager(DeckConfig::default());
    assert!(p.deck.click(p.dots[1]));
    assert_eq!(p.active(), Some(1));
    assert!(p.has(p.dots[1], "is-active"));

    p.deck.click(p.dots[0]);
    assert_eq!(p.active(), Some(1));

    p.deck.advance(Duration::from_secs(1));
    p.deck.click(p.dots[0]);
    assert_eq!(p.active(), Some(0));
}

#[test]
fn finale_scene_plays_and_leaving_it_resets() {
    let mut p = pager(DeckConfig::default().with_input_cooldown_ms(0));
    p.deck.wheel(100.0);
    p.deck.wheel(100.0);
    assert_eq!(p.active(), Some(2));

    p.deck.advance(Duration::from_millis(2_800));
    assert!(p.has(p.bubble, "is-fading"));
    assert!(!p.has(p.path, "is-active"));
    p.deck.advance(Duration::from_millis(200));
    assert!(p.has(p.path, "is-active"));
    p.deck.advance(Duration::from_millis(800));
    assert_eq!(p.deck.document().children(p.fountain).len(), PARTICLE_COUNT);

    p.deck.wheel(-100.0);
    assert!(!p.has(p.bubble, "is-fading"));
    assert!(!p.has(p.path, "is-active"));
    assert!(p.deck.document().children(p.fountain).is_empty());
}

#[test]
fn leaving_the_finale_early_cancels_its_pending_steps() {
    let mut p = pager(DeckConfig::default().with_input_cooldown_ms(0));
    p.deck.wheel(100.0);
    p.deck.wheel(100.0);
    p.deck.advance(Duration::from_millis(1_000));
    p.deck.wheel(-100.0);

    p.deck.advance(Duration::from_secs(5));
    assert!(!p.has(p.bubble, "is-fading"));
    assert!(p.deck.document().children(p.fountain).is_empty());
    assert_eq!(p.deck.pending_tasks(), 0);
}
