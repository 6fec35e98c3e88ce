//! Opt-in log output for the deck's lifecycle events.
//!
//! Mount, skip, capture hand-over, chart creation and resize flushes are
//! emitted as `tracing` events under the `deck_rs` target. Native hosts and
//! tests can install the compact stderr subscriber below; browser hosts
//! usually route the same events into a wasm console layer of their own and
//! never call it.

#[cfg(feature = "telemetry")]
const DEFAULT_FILTER: &str = "info";

/// Installs a compact fmt subscriber filtered by `RUST_LOG`, falling back to
/// `info`.
///
/// Returns `false` without side effects when the `telemetry` feature is off
/// or when the host already installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
