//! Model-call node (§4.5): assembles a prompt, calls the model backend, and
//! records a degraded response rather than propagating on failure.

use async_trait::async_trait;
use conduit_core::types::{ModelResponse, ModelStatus, StateDelta, TurnState};
use conduit_core::{ModelBackend, ModelRequest, Node, TraceMetadata, Tracer};
use conduit_prompt::{assemble_prompt, SYSTEM_CONTRACT};
use std::sync::Arc;
use std::time::Duration;

/// Generic over `M` rather than holding `Arc<dyn ModelBackend>` — the
/// backend trait uses RPITIT and isn't object-safe, mirroring the
/// teacher's non-object-safe `Provider` trait.
pub struct ModelCallNode<M: ModelBackend> {
    backend: Arc<M>,
    tracer: Arc<dyn Tracer>,
    system_addendum: Option<String>,
    timeout: Duration,
}

impl<M: ModelBackend> ModelCallNode<M> {
    /// Build a node bound to a model backend and tracer, with an optional
    /// caller-supplied system prompt addendum appended to the fixed
    /// contract and a wall-clock budget for the backend call.
    pub fn new(
        backend: Arc<M>,
        tracer: Arc<dyn Tracer>,
        system_addendum: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            backend,
            tracer,
            system_addendum,
            timeout,
        }
    }

    fn system_prompt(&self) -> String {
        match &self.system_addendum {
            Some(addendum) => format!("{SYSTEM_CONTRACT}\n{addendum}"),
            None => SYSTEM_CONTRACT.to_string(),
        }
    }
}

#[async_trait]
impl<M: ModelBackend> Node for ModelCallNode<M> {
    fn name(&self) -> &'static str {
        "model_call"
    }

    async fn run(&self, state: &TurnState) -> StateDelta {
        let trace_metadata = TraceMetadata {
            trace_id: state.trace_id.clone(),
            conversation_id: state.conversation_id.clone(),
            user_id: None,
        };

        let user_input = state
            .preprocessing_result
            .as_ref()
            .map(|p| p.normalized_text.as_str())
            .unwrap_or(state.raw_input.as_str());

        let prompt = assemble_prompt(
            SYSTEM_CONTRACT,
            user_input,
            state.memory_context.as_deref(),
            state.tool_context.as_deref(),
        );

        self.tracer
            .record_event(
                "model_call_attempted",
                serde_json::json!({"prompt_chars": prompt.chars().count()}),
                &trace_metadata,
            )
            .await;

        let request = ModelRequest {
            task: "turn".to_string(),
            prompt,
            system_prompt: self.system_prompt(),
            context: None,
            options: None,
        };

        let result = tokio::time::timeout(self.timeout, self.backend.generate(request)).await;

        let response = match result {
            Ok(Ok(backend_response)) => ModelResponse {
                status: ModelStatus::Success,
                output: backend_response.output,
                tool_call: backend_response.tool_call,
            },
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "model backend call failed");
                ModelResponse {
                    status: ModelStatus::Error,
                    output: "I wasn't able to generate a response just now.".to_string(),
                    tool_call: None,
                }
            }
            Err(_) => {
                tracing::warn!("model backend call timed out");
                ModelResponse {
                    status: ModelStatus::Error,
                    output: "I wasn't able to generate a response just now.".to_string(),
                    tool_call: None,
                }
            }
        };

        self.tracer
            .record_event(
                "model_call_completed",
                serde_json::json!({"status": format!("{:?}", response.status)}),
                &trace_metadata,
            )
            .await;

        StateDelta {
            model_response: Some(Some(response)),
            ..Default::default()
        }
    }
}
