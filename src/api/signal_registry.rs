use tracing::debug;

use crate::chart::ChartBackend;
use crate::core::PageKey;
use crate::error::{DeckError, DeckResult};
use crate::extensions::{DeckSignal, SignalContext, SignalListener};

use super::Deck;

impl<B: ChartBackend> Deck<B> {
    /// Registers a signal listener with a unique identifier.
    pub fn register_listener(&mut self, listener: Box<dyn SignalListener>) -> DeckResult<()> {
        let listener_id = listener.id().to_owned();
        if listener_id.is_empty() {
            return Err(DeckError::InvalidData(
                "listener id must not be empty".to_owned(),
            ));
        }
        if self.has_listener(&listener_id) {
            return Err(DeckError::InvalidData(format!(
                "listener with id `{listener_id}` is already registered"
            )));
        }
        self.listeners.push(listener);
        Ok(())
    }

    /// Unregisters a listener by id. Returns `true` when removed.
    pub fn unregister_listener(&mut self, listener_id: &str) -> bool {
        if let Some(position) = self
            .listeners
            .iter()
            .position(|entry| entry.id() == listener_id)
        {
            self.listeners.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn has_listener(&self, listener_id: &str) -> bool {
        self.listeners
            .iter()
            .any(|listener| listener.id() == listener_id)
    }

    fn signal_context(&self, source: Option<PageKey>) -> SignalContext {
        SignalContext {
            source,
            now_ms: u64::try_from(self.scheduler.now().as_millis()).unwrap_or(u64::MAX),
            capture_owner: self.capture.owner(),
        }
    }

    /// Synchronously hands `signal` to every listener in registration order.
    ///
    /// A page-changed signal also re-initializes every page.
    pub(super) fn dispatch_signal(&mut self, source: Option<PageKey>, signal: DeckSignal) {
        let context = self.signal_context(source);
        debug!(?signal, source = source.map(|key| key.0), "signal dispatched");
        for listener in &mut self.listeners {
            listener.on_signal(&signal, context);
        }
        if signal == DeckSignal::PageChanged {
            self.remount_all();
        }
    }
}
