use std::time::Duration;

use deck_rs::DeckError;
use deck_rs::api::{
    DECK_SNAPSHOT_JSON_SCHEMA_V1, Deck, DeckConfig, DeckSnapshot, PageStatus,
};
use deck_rs::chart::NullChartBackend;
use deck_rs::core::{Element, LayoutRect, Viewport};
use deck_rs::pages::ScenePagerPage;

#[test]
fn default_config_matches_documented_values() {
    let config = DeckConfig::default();
    assert_eq!(config.viewport, Viewport::new(1920, 1080));
    assert_eq!(config.frame_interval(), Duration::from_micros(16_667));
    assert_eq!(config.resize_debounce(), Duration::from_millis(250));
    assert_eq!(config.input_cooldown(), Duration::from_millis(1_000));
    assert!((config.visibility_threshold - 0.5).abs() < f64::EPSILON);
    assert!(config.validate().is_ok());
}

#[test]
fn partial_json_config_fills_defaults() {
    let config = DeckConfig::from_json_str(r#"{ "input_cooldown_ms": 600 }"#).expect("parse");
    assert_eq!(config.input_cooldown(), Duration::from_millis(600));
    assert_eq!(config.resize_debounce_ms, 250);

    let round_trip =
        DeckConfig::from_json_str(&config.to_json_pretty().expect("serialize")).expect("parse");
    assert_eq!(round_trip, config);
}

#[test]
fn invalid_configs_are_rejected() {
    let bad_threshold = DeckConfig::default().with_visibility_threshold(1.5);
    assert!(matches!(
        Deck::new(NullChartBackend::default(), bad_threshold),
        Err(DeckError::InvalidConfig(_))
    ));

    let bad_viewport = DeckConfig::new(Viewport::new(0, 0));
    assert!(Deck::new(NullChartBackend::default(), bad_viewport).is_err());

    let parsed = DeckConfig::from_json_str(r#"{ "frame_interval_micros": 0 }"#);
    assert!(matches!(parsed, Err(DeckError::InvalidConfig(_))));

    assert!(DeckConfig::from_json_str("not json").is_err());
}

#[test]
fn page_threshold_override_is_validated_at_registration() {
    let mut deck = Deck::new(NullChartBackend::default(), DeckConfig::default()).expect("deck");
    let result = deck.register(Box::new(
        ScenePagerPage::new("page-pager").with_threshold(f64::NAN),
    ));
    assert!(result.is_err());
    assert_eq!(deck.page_count(), 0);
}

fn snapshot_deck() -> Deck<NullChartBackend> {
    let mut deck = Deck::new(NullChartBackend::default(), DeckConfig::default()).expect("deck");
    let doc = deck.document_mut();
    let root = doc.root();
    let page = doc
        .append(
            root,
            Element::new("section")
                .with_id("page-pager")
                .with_layout(LayoutRect::new(0.0, 1080.0)),
        )
        .expect("append page");
    for _ in 0..2 {
        doc.append(page, Element::new("div").with_class("scene"))
            .expect("append scene");
    }
    doc.append(page, Element::new("nav").with_class("pagination"))
        .expect("append pagination");
    deck.register(Box::new(ScenePagerPage::new("page-pager")))
        .expect("register pager");
    deck.register(Box::new(ScenePagerPage::new("page-absent")))
        .expect("register absent");
    deck.boot();
    deck.scroll_to(0.0);
    deck.advance(Duration::from_millis(120));
    deck
}

#[test]
fn snapshot_reports_page_state() {
    let deck = snapshot_deck();
    let snapshot = deck.snapshot();

    assert_eq!(snapshot.now_ms, 120);
    assert_eq!(snapshot.capture_owner.as_deref(), Some("page-pager"));
    assert_eq!(snapshot.pages.len(), 2);

    let pager = &snapshot.pages[0];
    assert_eq!(pager.status, PageStatus::Mounted);
    assert!(pager.visible);
    assert!((pager.last_ratio - 1.0).abs() < 1e-12);
    assert_eq!(pager.bindings, 2);

    assert_eq!(snapshot.pages[1].status, PageStatus::Dormant);
    assert_eq!(snapshot.pages[1].bindings, 0);
}

#[test]
fn snapshot_json_contract_round_trips() {
    let deck = snapshot_deck();
    let json = deck
        .snapshot_json_contract_v1_pretty()
        .expect("contract json");
    assert!(json.contains("\"schema_version\": 1"));

    let parsed = DeckSnapshot::from_json_compat_str(&json).expect("parse contract");
    assert_eq!(parsed, deck.snapshot());

    let bare = deck.snapshot().to_json_pretty().expect("bare json");
    let parsed_bare = DeckSnapshot::from_json_compat_str(&bare).expect("parse bare");
    assert_eq!(parsed_bare, parsed);
}

#[test]
fn unknown_snapshot_schema_is_rejected() {
    let deck = snapshot_deck();
    let json = deck
        .snapshot_json_contract_v1_pretty()
        .expect("contract json")
        .replacen(
            &format!("\"schema_version\": {DECK_SNAPSHOT_JSON_SCHEMA_V1}"),
            "\"schema_version\": 99",
            1,
        );
    assert!(DeckSnapshot::from_json_compat_str(&json).is_err());
}
