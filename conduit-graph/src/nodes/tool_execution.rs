//! Tool-execution node (§4.6): runs at most once per turn, never touches
//! memory or authorization flags.

use async_trait::async_trait;
use conduit_core::guardrail::{check_tool_call_limit, format_tool_context, sanitize_results};
use conduit_core::types::{SearchResult, StateDelta, TurnState};
use conduit_core::{Node, ToolResult, TraceMetadata, Tracer};
use conduit_tool::ToolRegistry;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;

/// Runs the tool named in `model_response.tool_call`, sanitizes its raw
/// output, and folds the result into `tool_context`. Never reads or writes
/// memory, never touches `memory_read_authorized`/`memory_write_authorized`.
pub struct ToolExecutionNode {
    tools: Arc<ToolRegistry>,
    call_timeout: std::time::Duration,
    tracer: Arc<dyn Tracer>,
}

impl ToolExecutionNode {
    /// Build a node bound to a tool registry, a per-call timeout, and a
    /// tracer for the `tool_call_detected`/`tool_execution_*` event pair.
    pub fn new(tools: Arc<ToolRegistry>, call_timeout: std::time::Duration, tracer: Arc<dyn Tracer>) -> Self {
        Self { tools, call_timeout, tracer }
    }
}

#[async_trait]
impl Node for ToolExecutionNode {
    fn name(&self) -> &'static str {
        "tool_execution"
    }

    async fn run(&self, state: &TurnState) -> StateDelta {
        let Some(tool_call) = state
            .model_response
            .as_ref()
            .and_then(|r| r.tool_call.as_ref())
        else {
            return StateDelta::default();
        };

        let trace_metadata = TraceMetadata {
            trace_id: state.trace_id.clone(),
            conversation_id: state.conversation_id.clone(),
            user_id: None,
        };
        self.tracer
            .record_event(
                "tool_call_detected",
                serde_json::json!({"name": tool_call.name}),
                &trace_metadata,
            )
            .await;

        // Step 1: guardrail check.
        if check_tool_call_limit(state.tool_call_count).is_err() {
            self.tracer
                .record_event(
                    "tool_execution_failed",
                    serde_json::json!({"name": tool_call.name, "reason": "tool_call_limit"}),
                    &trace_metadata,
                )
                .await;
            return StateDelta {
                model_response: Some(None),
                tool_results: Some(Some(Vec::new())),
                tool_context: Some(None),
                ..Default::default()
            };
        }

        // Step 2: look up the tool.
        let Some(tool) = self.tools.get(&tool_call.name).cloned() else {
            self.tracer
                .record_event(
                    "tool_execution_failed",
                    serde_json::json!({"name": tool_call.name, "reason": "unknown_tool"}),
                    &trace_metadata,
                )
                .await;
            return StateDelta {
                model_response: Some(None),
                tool_call_count: Some(state.tool_call_count + 1),
                tool_results: Some(Some(Vec::new())),
                tool_context: Some(None),
                ..Default::default()
            };
        };

        self.tracer
            .record_event(
                "tool_execution_started",
                serde_json::json!({"name": tool_call.name}),
                &trace_metadata,
            )
            .await;

        // Step 3-4: invoke the tool, bounded by its own timeout.
        let arguments = tool_call.arguments.clone();
        let start = Instant::now();
        let result: ToolResult = match timeout(self.call_timeout, tool.call(arguments)).await {
            Ok(r) => r,
            Err(_) => ToolResult::fail(
                format!("tool '{}' timed out", tool_call.name),
                start.elapsed().as_millis() as u64,
            ),
        };

        if result.success {
            self.tracer
                .record_event(
                    "tool_execution_completed",
                    serde_json::json!({"name": tool_call.name, "duration_ms": result.execution_time_ms}),
                    &trace_metadata,
                )
                .await;
        } else {
            self.tracer
                .record_event(
                    "tool_execution_failed",
                    serde_json::json!({"name": tool_call.name, "reason": "tool_error"}),
                    &trace_metadata,
                )
                .await;
        }

        let raw_results = extract_search_results(&result);
        let sanitized = sanitize_results(&raw_results);

        // Step 5: bound the context string.
        let tool_context = format_tool_context(&sanitized, conduit_core::guardrail::MAX_TOOL_CONTEXT_CHARS);

        // Step 6: increment count, clear the consumed response entirely so
        // decision-logic re-enters `call_model` with the fresh
        // `tool_context` (§4.6 step 6).
        StateDelta {
            model_response: Some(None),
            tool_call_count: Some(state.tool_call_count + 1),
            tool_results: Some(Some(sanitized)),
            tool_context: Some(if tool_context.is_empty() {
                None
            } else {
                Some(tool_context)
            }),
            ..Default::default()
        }
    }
}

/// Pull a result list out of a `ToolResult`'s `data` payload. Tools that
/// don't expose a `results` array (e.g. `EchoTool`) contribute nothing.
fn extract_search_results(result: &ToolResult) -> Vec<SearchResult> {
    if !result.success {
        return Vec::new();
    }
    result
        .data
        .get("results")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value::<SearchResult>(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}
