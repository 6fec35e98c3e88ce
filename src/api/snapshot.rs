use serde::{Deserialize, Serialize};

use crate::chart::ChartBackend;
use crate::core::Viewport;
use crate::error::{DeckError, DeckResult};

use super::page::PageStatus;
use super::Deck;

pub const DECK_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub container_id: String,
    pub status: PageStatus,
    pub visible: bool,
    pub last_ratio: f64,
    pub pending_tasks: usize,
    pub bindings: usize,
}

/// Serializable deterministic state of a deck, used by regression tests and
/// host debugging tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSnapshot {
    pub now_ms: u64,
    pub viewport: Viewport,
    pub scroll_y: f64,
    pub pages: Vec<PageSnapshot>,
    pub capture_owner: Option<String>,
    pub capture_waiting: Vec<String>,
    pub pending_tasks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: DeckSnapshot,
}

impl DeckSnapshot {
    pub fn to_json_pretty(&self) -> DeckResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DeckError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }

    pub fn to_json_contract_v1_pretty(&self) -> DeckResult<String> {
        let payload = DeckSnapshotJsonContractV1 {
            schema_version: DECK_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            DeckError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> DeckResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<DeckSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: DeckSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            DeckError::InvalidData(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != DECK_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(DeckError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

impl<B: ChartBackend> Deck<B> {
    #[must_use]
    pub fn snapshot(&self) -> DeckSnapshot {
        let pages = self
            .pages
            .iter()
            .map(|entry| PageSnapshot {
                container_id: entry.controller.container_id().to_owned(),
                status: entry.status.clone(),
                visible: entry.gate.is_visible(),
                last_ratio: entry.gate.last_ratio(),
                pending_tasks: self.scheduler.pending_for(entry.key),
                bindings: self.bindings.count_for(entry.key),
            })
            .collect();
        DeckSnapshot {
            now_ms: u64::try_from(self.scheduler.now().as_millis()).unwrap_or(u64::MAX),
            viewport: self.viewport,
            scroll_y: self.scroll_y,
            pages,
            capture_owner: self.capture_owner().map(str::to_owned),
            capture_waiting: self
                .capture_waiting()
                .into_iter()
                .map(str::to_owned)
                .collect(),
            pending_tasks: self.scheduler.pending(),
        }
    }

    pub fn snapshot_json_contract_v1_pretty(&self) -> DeckResult<String> {
        self.snapshot().to_json_contract_v1_pretty()
    }
}
