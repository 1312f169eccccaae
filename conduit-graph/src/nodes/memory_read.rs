//! Memory-read node (§4.4): a single call to the memory boundary, translated
//! into a degraded state rather than propagated on any failure.

use async_trait::async_trait;
use conduit_core::guardrail::{format_memory_context, MAX_MEMORY_CONTEXT_CHARS};
use conduit_core::types::{MemoryReadStatus, StateDelta, TurnState};
use conduit_core::{MemoryBoundary, Node, TraceMetadata, Tracer};
use std::sync::Arc;
use std::time::Duration;

/// The fixed key every turn's facts are stored/retrieved under. A single
/// per-conversation slot is sufficient for the short-term recall this graph
/// performs; a richer keyspace belongs to the long-term memory interface.
pub const MEMORY_KEY: &str = "facts";

/// Runs only when `memory_read_authorized`; reads `MEMORY_KEY` for the
/// turn's conversation and folds the outcome into `memory_read_result` and
/// `memory_available`.
pub struct MemoryReadNode {
    memory: Arc<dyn MemoryBoundary>,
    tracer: Arc<dyn Tracer>,
    call_timeout: Duration,
}

impl MemoryReadNode {
    /// Build a node bound to a memory boundary, tracer, and a wall-clock
    /// budget for the read call.
    pub fn new(memory: Arc<dyn MemoryBoundary>, tracer: Arc<dyn Tracer>, call_timeout: Duration) -> Self {
        Self {
            memory,
            tracer,
            call_timeout,
        }
    }
}

#[async_trait]
impl Node for MemoryReadNode {
    fn name(&self) -> &'static str {
        "memory_read"
    }

    async fn run(&self, state: &TurnState) -> StateDelta {
        if !state.memory_read_authorized {
            return StateDelta {
                memory_read_attempted: Some(true),
                ..Default::default()
            };
        }

        let trace_metadata = TraceMetadata {
            trace_id: state.trace_id.clone(),
            conversation_id: state.conversation_id.clone(),
            user_id: None,
        };

        let response = match tokio::time::timeout(
            self.call_timeout,
            self.memory.read(&state.conversation_id, MEMORY_KEY, true),
        )
        .await
        {
            Ok(r) => r,
            Err(_) => conduit_core::MemoryReadResponse {
                status: MemoryReadStatus::Unavailable,
                data: None,
                error: Some("memory read timed out".to_string()),
            },
        };

        self.tracer
            .record_event(
                "memory_read_attempted",
                serde_json::json!({"status": format!("{:?}", response.status)}),
                &trace_metadata,
            )
            .await;

        match response.status {
            MemoryReadStatus::Success => {
                let context = response
                    .data
                    .as_ref()
                    .map(|v| format_memory_context(v, MAX_MEMORY_CONTEXT_CHARS));
                StateDelta {
                    memory_read_attempted: Some(true),
                    memory_read_result: Some(response.data),
                    memory_available: Some(true),
                    memory_context: Some(context),
                    ..Default::default()
                }
            }
            MemoryReadStatus::Unavailable => StateDelta {
                memory_read_attempted: Some(true),
                memory_available: Some(false),
                ..Default::default()
            },
            MemoryReadStatus::NotFound | MemoryReadStatus::Unauthorized => StateDelta {
                memory_read_attempted: Some(true),
                memory_available: Some(true),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_core::types::InputType;
    use conduit_core::{ConversationId, TraceId};
    use conduit_memory::{DisabledMemory, InMemoryMemory};
    use conduit_tracer::NoopTracer;

    fn state(authorized: bool) -> TurnState {
        let mut s = TurnState::new(
            ConversationId::new("c1"),
            TraceId::new("t1"),
            0,
            "remember this".into(),
            InputType::Text,
            None,
        );
        s.memory_read_authorized = authorized;
        s
    }

    #[tokio::test]
    async fn unauthorized_read_marks_attempted_without_touching_memory() {
        let node = MemoryReadNode::new(Arc::new(InMemoryMemory::new()), Arc::new(NoopTracer), Duration::from_secs(1));
        let delta = node.run(&state(false)).await;
        assert_eq!(delta.memory_read_attempted, Some(true));
        assert!(delta.memory_read_result.is_none());
    }

    #[tokio::test]
    async fn not_found_keeps_memory_available_true() {
        let node = MemoryReadNode::new(Arc::new(InMemoryMemory::new()), Arc::new(NoopTracer), Duration::from_secs(1));
        let delta = node.run(&state(true)).await;
        assert_eq!(delta.memory_available, Some(true));
        assert_eq!(delta.memory_read_result, None);
    }

    #[tokio::test]
    async fn success_populates_result_and_marks_available() {
        let memory = Arc::new(InMemoryMemory::new());
        memory
            .write(&ConversationId::new("c1"), MEMORY_KEY, serde_json::json!({"a": 1}), true)
            .await;
        let node = MemoryReadNode::new(memory, Arc::new(NoopTracer), Duration::from_secs(1));
        let delta = node.run(&state(true)).await;
        assert_eq!(delta.memory_available, Some(true));
        assert_eq!(delta.memory_read_result, Some(Some(serde_json::json!({"a": 1}))));
    }

    #[tokio::test]
    async fn unavailable_backend_marks_memory_unavailable() {
        let node = MemoryReadNode::new(Arc::new(DisabledMemory), Arc::new(NoopTracer), Duration::from_secs(1));
        let delta = node.run(&state(true)).await;
        assert_eq!(delta.memory_available, Some(false));
        assert_eq!(delta.memory_read_result, None);
    }
}
