//! Format-response node (§4.7): the terminal node of every turn, always run
//! exactly once, never fails.

use async_trait::async_trait;
use conduit_core::types::{StateDelta, TurnState};
use conduit_core::Node;

/// Produces `final_output`/`formatted_response` from whatever the model
/// last said, falling back to a fixed apology when no model response was
/// ever recorded (e.g. the node-visit budget was exhausted first).
pub struct FormatResponseNode;

const FALLBACK_OUTPUT: &str =
    "I wasn't able to finish that turn. Please try again or rephrase your request.";

#[async_trait]
impl Node for FormatResponseNode {
    fn name(&self) -> &'static str {
        "format_response"
    }

    async fn run(&self, state: &TurnState) -> StateDelta {
        let final_output = state
            .model_response
            .as_ref()
            .map(|r| r.output.clone())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_OUTPUT.to_string());

        let formatted_response = serde_json::json!({
            "conversation_id": state.conversation_id,
            "trace_id": state.trace_id,
            "output": final_output,
        })
        .to_string();

        StateDelta {
            final_output: Some(final_output),
            formatted_response: Some(formatted_response),
            command: Some(conduit_core::types::Command::End),
            ..Default::default()
        }
    }
}
