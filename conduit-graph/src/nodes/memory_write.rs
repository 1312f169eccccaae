//! Memory-write node (§4.4): runs at most once per turn, persisting
//! whatever fact decision-logic judged worth keeping.

use crate::nodes::memory_read::MEMORY_KEY;
use async_trait::async_trait;
use conduit_core::types::{MemoryWriteStatus, StateDelta, TurnState};
use conduit_core::{MemoryBoundary, Node, TraceMetadata, Tracer};
use std::sync::Arc;
use std::time::Duration;

/// Runs only when `memory_write_authorized`; writes the turn's model output
/// under `MEMORY_KEY` and records the outcome.
pub struct MemoryWriteNode {
    memory: Arc<dyn MemoryBoundary>,
    tracer: Arc<dyn Tracer>,
    call_timeout: Duration,
}

impl MemoryWriteNode {
    /// Build a node bound to a memory boundary, tracer, and a wall-clock
    /// budget for the write call.
    pub fn new(memory: Arc<dyn MemoryBoundary>, tracer: Arc<dyn Tracer>, call_timeout: Duration) -> Self {
        Self {
            memory,
            tracer,
            call_timeout,
        }
    }
}

#[async_trait]
impl Node for MemoryWriteNode {
    fn name(&self) -> &'static str {
        "memory_write"
    }

    async fn run(&self, state: &TurnState) -> StateDelta {
        let trace_metadata = TraceMetadata {
            trace_id: state.trace_id.clone(),
            conversation_id: state.conversation_id.clone(),
            user_id: None,
        };
        self.tracer
            .record_event("memory_write_attempted", serde_json::json!({}), &trace_metadata)
            .await;

        if !state.memory_write_authorized {
            return StateDelta {
                memory_write_status: Some(MemoryWriteStatus::Unauthorized),
                ..Default::default()
            };
        }

        let payload = serde_json::json!({
            "raw_input": state.raw_input,
            "output": state.model_response.as_ref().map(|r| r.output.clone()),
        });

        let response = match tokio::time::timeout(
            self.call_timeout,
            self.memory.write(&state.conversation_id, MEMORY_KEY, payload, true),
        )
        .await
        {
            Ok(r) => r,
            Err(_) => conduit_core::MemoryWriteResponse {
                status: MemoryWriteStatus::Failed,
                error: Some("memory write timed out".to_string()),
            },
        };

        match response.status {
            MemoryWriteStatus::Success => StateDelta {
                memory_write_status: Some(MemoryWriteStatus::Success),
                ..Default::default()
            },
            MemoryWriteStatus::Failed => StateDelta {
                memory_write_status: Some(MemoryWriteStatus::Failed),
                memory_available: Some(false),
                ..Default::default()
            },
            MemoryWriteStatus::Unauthorized => StateDelta {
                memory_write_status: Some(MemoryWriteStatus::Unauthorized),
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
            "remember I like tea".into(),
            InputType::Text,
            None,
        );
        s.memory_write_authorized = authorized;
        s
    }

    #[tokio::test]
    async fn unauthorized_write_is_rejected() {
        let node = MemoryWriteNode::new(Arc::new(InMemoryMemory::new()), Arc::new(NoopTracer), Duration::from_secs(1));
        let delta = node.run(&state(false)).await;
        assert_eq!(delta.memory_write_status, Some(MemoryWriteStatus::Unauthorized));
    }

    #[tokio::test]
    async fn authorized_write_succeeds_against_in_memory_store() {
        let node = MemoryWriteNode::new(Arc::new(InMemoryMemory::new()), Arc::new(NoopTracer), Duration::from_secs(1));
        let delta = node.run(&state(true)).await;
        assert_eq!(delta.memory_write_status, Some(MemoryWriteStatus::Success));
    }

    #[tokio::test]
    async fn failed_write_marks_memory_unavailable() {
        let node = MemoryWriteNode::new(Arc::new(DisabledMemory), Arc::new(NoopTracer), Duration::from_secs(1));
        let delta = node.run(&state(true)).await;
        assert_eq!(delta.memory_write_status, Some(MemoryWriteStatus::Failed));
        assert_eq!(delta.memory_available, Some(false));
    }
}
