use serde::{Deserialize, Serialize};

use crate::core::PageKey;

/// Document-scoped custom signals.
///
/// Dispatch is synchronous and fire-and-forget: listeners run in registration
/// order during the call that emitted the signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeckSignal {
    /// The host switched pages; every page re-runs its initialization.
    PageChanged,
    SidebarItemChanged {
        index: usize,
        text: String,
    },
    ChartBarClicked {
        index: usize,
        label: String,
        value: String,
    },
}

/// Read-only state passed alongside every signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalContext {
    /// Page that emitted the signal; `None` for host-emitted signals.
    pub source: Option<PageKey>,
    pub now_ms: u64,
    pub capture_owner: Option<PageKey>,
}

pub trait SignalListener {
    fn id(&self) -> &str;
    fn on_signal(&mut self, signal: &DeckSignal, context: SignalContext);
}
