//! The orchestrator (§4.1): compiles the six nodes plus decision-logic into
//! a single-entry, single-terminal graph and drives one turn at a time.
//! Grounded on the teacher's `LocalOrch` — a thin dispatch layer over a
//! name-keyed map of collaborators — generalized from agent dispatch to
//! node dispatch within one turn.

use crate::config::GraphConfig;
use crate::decide::decide;
use crate::nodes::{
    FormatResponseNode, MemoryReadNode, MemoryWriteNode, ModelCallNode, PreprocessNode,
    ToolExecutionNode,
};
use conduit_core::types::{Command, InputType, ModelStatus, TurnState};
use conduit_core::{ConversationId, MemoryBoundary, ModelBackend, Node, TraceId, Tracer};
use conduit_tool::ToolRegistry;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Whether a turn completed cleanly or was forced to a degraded conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStatus {
    /// Format-response was reached through normal routing.
    Ok,
    /// The node-visit budget was exhausted, or the model backend failed and
    /// the user saw a fallback string.
    Degraded,
}

/// The orchestrator's invocation contract (§4.1): `{output, status,
/// conversation_id, trace_id}`.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The user-visible text for this turn.
    pub output: String,
    /// Whether the turn completed cleanly.
    pub status: TurnStatus,
    /// Echoes the caller-supplied (or generated) conversation id.
    pub conversation_id: ConversationId,
    /// Echoes the caller-supplied (or generated) trace id.
    pub trace_id: TraceId,
}

/// Owns every collaborator a turn needs: the memory boundary, tool
/// registry, tracer, and the single model backend this instance is wired
/// to. Generic over `M` for the same reason [`ModelCallNode`] is — the
/// backend trait isn't object-safe.
pub struct Orchestrator<M: ModelBackend> {
    preprocess: PreprocessNode,
    memory_read: MemoryReadNode,
    memory_write: MemoryWriteNode,
    model_call: ModelCallNode<M>,
    tool_execution: ToolExecutionNode,
    format_response: FormatResponseNode,
    config: GraphConfig,
}

impl<M: ModelBackend> Orchestrator<M> {
    /// Wire up an orchestrator from its collaborators.
    pub fn new(
        backend: Arc<M>,
        memory: Arc<dyn MemoryBoundary>,
        tools: Arc<ToolRegistry>,
        tracer: Arc<dyn Tracer>,
        config: GraphConfig,
    ) -> Self {
        Self {
            preprocess: PreprocessNode,
            memory_read: MemoryReadNode::new(memory.clone(), tracer.clone(), config.memory_call_timeout),
            memory_write: MemoryWriteNode::new(memory, tracer.clone(), config.memory_call_timeout),
            model_call: ModelCallNode::new(
                backend,
                tracer.clone(),
                config.system_addendum.clone(),
                config.model_call_timeout,
            ),
            tool_execution: ToolExecutionNode::new(tools, config.tool_call_timeout, tracer),
            format_response: FormatResponseNode,
            config,
        }
    }

    /// Run one turn to completion (§4.1's invocation contract). Caller-
    /// supplied ids are honored verbatim; absent ones are generated here,
    /// standing in for the out-of-scope transport shim.
    pub async fn invoke(
        &self,
        raw_input: String,
        conversation_id: Option<ConversationId>,
        trace_id: Option<TraceId>,
    ) -> TurnOutcome {
        let conversation_id =
            conversation_id.unwrap_or_else(|| ConversationId::new(uuid::Uuid::new_v4().to_string()));
        let trace_id = trace_id.unwrap_or_else(|| TraceId::new(uuid::Uuid::new_v4().to_string()));
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let mut state = TurnState::new(
            conversation_id.clone(),
            trace_id.clone(),
            created_at,
            raw_input,
            InputType::Text,
            None,
        );

        let mut degraded = false;
        let mut visits = 0usize;

        loop {
            let routing_delta = decide(&state);
            state.apply(routing_delta);
            visits += 1;

            if visits > self.config.max_node_visits {
                degraded = true;
                let delta = self.format_response.run(&state).await;
                state.apply(delta);
                break;
            }

            match state.command {
                Some(Command::Preprocess) => {
                    let delta = self.preprocess.run(&state).await;
                    state.apply(delta);
                }
                Some(Command::MemoryRead) => {
                    let delta = self.memory_read.run(&state).await;
                    state.apply(delta);
                }
                Some(Command::CallModel) => {
                    let delta = self.model_call.run(&state).await;
                    if let Some(Some(r)) = &delta.model_response {
                        if r.status == ModelStatus::Error {
                            degraded = true;
                        }
                    }
                    state.apply(delta);
                }
                Some(Command::ExecuteTool) => {
                    let delta = self.tool_execution.run(&state).await;
                    state.apply(delta);
                }
                Some(Command::MemoryWrite) => {
                    let delta = self.memory_write.run(&state).await;
                    state.apply(delta);
                }
                Some(Command::Format) => {
                    let delta = self.format_response.run(&state).await;
                    state.apply(delta);
                    break;
                }
                Some(Command::End) | None => break,
            }
        }

        let output = state
            .final_output
            .unwrap_or_else(|| "I wasn't able to finish that turn.".to_string());

        TurnOutcome {
            output,
            status: if degraded {
                TurnStatus::Degraded
            } else {
                TurnStatus::Ok
            },
            conversation_id,
            trace_id,
        }
    }
}
