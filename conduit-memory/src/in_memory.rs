//! `InMemoryMemory`: a `RwLock<HashMap<(String, String), Value>>` keyed on
//! `(conversation_id, key)`, grounded on `neuron-state-memory`'s composite-key
//! pattern but with a real tuple key instead of a null-joined string — a key
//! containing the separator byte can't collide with a neighboring scope.

use async_trait::async_trait;
use conduit_core::{
    ConversationId, MemoryBoundary, MemoryReadResponse, MemoryReadStatus, MemoryWriteResponse,
    MemoryWriteStatus,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process memory boundary suitable for tests and single-process use.
pub struct InMemoryMemory {
    data: RwLock<HashMap<(String, String), serde_json::Value>>,
}

impl InMemoryMemory {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemoryBoundary for InMemoryMemory {
    async fn read(
        &self,
        conversation_id: &ConversationId,
        key: &str,
        authorized: bool,
    ) -> MemoryReadResponse {
        if !authorized {
            return MemoryReadResponse {
                status: MemoryReadStatus::Unauthorized,
                data: None,
                error: Some("memory read not authorized by decision-logic".into()),
            };
        }

        let composite = (conversation_id.as_str().to_string(), key.to_string());
        let data = self.data.read().await;
        match data.get(&composite) {
            Some(value) => MemoryReadResponse {
                status: MemoryReadStatus::Success,
                data: Some(value.clone()),
                error: None,
            },
            None => MemoryReadResponse {
                status: MemoryReadStatus::NotFound,
                data: None,
                error: Some(format!("no memory for key {key}")),
            },
        }
    }

    async fn write(
        &self,
        conversation_id: &ConversationId,
        key: &str,
        data_value: serde_json::Value,
        authorized: bool,
    ) -> MemoryWriteResponse {
        if !authorized {
            return MemoryWriteResponse {
                status: MemoryWriteStatus::Unauthorized,
                error: Some("memory write not authorized by decision-logic".into()),
            };
        }

        let composite = (conversation_id.as_str().to_string(), key.to_string());
        let mut data = self.data.write().await;
        data.insert(composite, data_value);
        MemoryWriteResponse {
            status: MemoryWriteStatus::Success,
            error: None,
        }
    }
}
