//! The memory boundary contract (§4.8): two typed, non-throwing operations.

use crate::id::ConversationId;
use crate::types::{MemoryReadStatus, MemoryWriteStatus};
use async_trait::async_trait;

/// Response from `MemoryBoundary::read`.
#[derive(Debug, Clone)]
pub struct MemoryReadResponse {
    /// Outcome of the read.
    pub status: MemoryReadStatus,
    /// Retrieved data, present only on `Success`.
    pub data: Option<serde_json::Value>,
    /// Error description, present on any non-`Success` status.
    pub error: Option<String>,
}

/// Response from `MemoryBoundary::write`.
#[derive(Debug, Clone)]
pub struct MemoryWriteResponse {
    /// Outcome of the write.
    pub status: MemoryWriteStatus,
    /// Error description, present on any non-`Success` status.
    pub error: Option<String>,
}

/// Protocol ④: authorized, typed memory read/write (§4.8).
///
/// No implementation may let a raised error escape this boundary — lock
/// contention, corruption, and serialization failures must all be caught
/// and reported as a typed status.
#[async_trait]
pub trait MemoryBoundary: Send + Sync {
    /// Read derived facts under `key` for `conversation_id`. `authorized`
    /// must be `true`, set only by decision-logic; an unauthorized read
    /// returns `Unauthorized` without touching the backing store.
    async fn read(
        &self,
        conversation_id: &ConversationId,
        key: &str,
        authorized: bool,
    ) -> MemoryReadResponse;

    /// Write `data` under `key` for `conversation_id`, upserting any
    /// existing value. `authorized` must be `true`, set only by
    /// decision-logic.
    async fn write(
        &self,
        conversation_id: &ConversationId,
        key: &str,
        data: serde_json::Value,
        authorized: bool,
    ) -> MemoryWriteResponse;
}
