use deck_rs::telemetry::init_default_tracing;

#[cfg(feature = "telemetry")]
#[test]
fn default_subscriber_installs_once() {
    assert!(init_default_tracing());
    assert!(!init_default_tracing());
}

#[cfg(not(feature = "telemetry"))]
#[test]
fn tracing_setup_is_a_no_op_without_the_feature() {
    assert!(!init_default_tracing());
}
