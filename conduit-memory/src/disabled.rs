//! `DisabledMemory`: zero state, zero locking — read always `unavailable`,
//! write always `failed`. Grounded on `original_source`'s
//! `DisabledMemoryController`, used there to verify agent behavior is
//! identical with memory on or off (§8 scenario S6).

use async_trait::async_trait;
use conduit_core::{
    ConversationId, MemoryBoundary, MemoryReadResponse, MemoryReadStatus, MemoryWriteResponse,
    MemoryWriteStatus,
};

/// A memory boundary that never stores anything and always reports a
/// degraded status.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledMemory;

#[async_trait]
impl MemoryBoundary for DisabledMemory {
    async fn read(
        &self,
        _conversation_id: &ConversationId,
        _key: &str,
        _authorized: bool,
    ) -> MemoryReadResponse {
        MemoryReadResponse {
            status: MemoryReadStatus::Unavailable,
            data: None,
            error: Some("memory is disabled".into()),
        }
    }

    async fn write(
        &self,
        _conversation_id: &ConversationId,
        _key: &str,
        _data: serde_json::Value,
        _authorized: bool,
    ) -> MemoryWriteResponse {
        MemoryWriteResponse {
            status: MemoryWriteStatus::Failed,
            error: Some("memory is disabled".into()),
        }
    }
}
