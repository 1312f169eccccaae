//! `EchoTool`: a deterministic test fixture, mirroring the teacher's own
//! `EchoTool` used to exercise registry and orchestrator plumbing without a
//! network call.

use conduit_core::{ToolDyn, ToolResult};
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

/// Echoes its input back as `{"echoed": <input>}`. Never fails.
pub struct EchoTool;

impl ToolDyn for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echoes the given input back, unchanged. Test fixture only."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "message": {"type": "string", "description": "Text to echo back"}
            },
            "required": ["message"],
        })
    }

    fn call(
        &self,
        arguments: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = ToolResult> + Send + '_>> {
        Box::pin(async move {
            let start = Instant::now();
            if arguments.get("message").and_then(|v| v.as_str()).is_none() {
                return ToolResult::fail(
                    "missing required field: message",
                    start.elapsed().as_millis() as u64,
                );
            }
            ToolResult::ok(json!({"echoed": arguments}), start.elapsed().as_millis() as u64)
        })
    }
}
