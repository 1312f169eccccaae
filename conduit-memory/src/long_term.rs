//! Long-term memory interface (§4.8 "A separate long-term-memory interface
//! exists with the same shape but append-only semantics..."). Out of scope
//! for the core beyond its contract — shipped here as a trait plus a
//! `DisabledLongTermMemory`, with no durable implementation.

use async_trait::async_trait;

/// Append-only, retrieve-by-user-and-type memory, distinct from the
/// per-conversation short-term `MemoryBoundary`.
#[async_trait]
pub trait LongTermMemory: Send + Sync {
    /// Append one fact of `kind` for `user_id`. Never overwrites a prior
    /// entry — long-term memory only grows.
    async fn append(&self, user_id: &str, kind: &str, data: serde_json::Value) -> Result<(), String>;

    /// Retrieve every fact of `kind` recorded for `user_id`, oldest first.
    async fn retrieve(&self, user_id: &str, kind: &str) -> Result<Vec<serde_json::Value>, String>;
}

/// A long-term memory that stores nothing and returns an empty result set.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLongTermMemory;

#[async_trait]
impl LongTermMemory for DisabledLongTermMemory {
    async fn append(&self, _user_id: &str, _kind: &str, _data: serde_json::Value) -> Result<(), String> {
        Err("long-term memory is disabled".into())
    }

    async fn retrieve(&self, _user_id: &str, _kind: &str) -> Result<Vec<serde_json::Value>, String> {
        Ok(Vec::new())
    }
}
