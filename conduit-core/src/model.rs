//! The model backend contract (§4.5, §6). Uses return-position-impl-Future
//! rather than `async_trait` — the orchestrator is generic over exactly one
//! concrete backend type, so this trait is deliberately not object-safe,
//! mirroring the teacher's `Provider` trait for the same reason.

use crate::error::ModelError;
use crate::types::ToolCallPayload;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Request sent to a model backend (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRequest {
    /// A short label for what this call is for (telemetry only).
    pub task: String,
    /// The assembled user-role prompt (§4.7 output).
    pub prompt: String,
    /// The system channel contract (§4.7's `system_contract`, plus any
    /// caller addendum).
    pub system_prompt: String,
    /// Optional free-form context passthrough.
    pub context: Option<serde_json::Value>,
    /// Optional backend-specific options (model name, temperature, ...).
    pub options: Option<serde_json::Value>,
}

/// Response from a model backend (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBackendResponse {
    /// Visible output text.
    pub output: String,
    /// Structural metadata (token counts, model name, ...) — never raw
    /// prompts or credentials; these would be denied if forwarded to a
    /// tracer.
    pub metadata: serde_json::Value,
    /// A parsed tool-call, if the backend's raw output carried the
    /// `[TOOL_CALL]{...}` marker (§6).
    pub tool_call: Option<ToolCallPayload>,
}

/// Protocol: request/response only (§4.5, §6). Backends must not panic;
/// transient failures are reported as `Err(ModelError)`, which the
/// model-call node (§4.5) catches and turns into a degraded
/// `ModelResponse{status: Error}` rather than propagating.
pub trait ModelBackend: Send + Sync {
    /// Send one generation request.
    fn generate(
        &self,
        request: ModelRequest,
    ) -> impl Future<Output = Result<ModelBackendResponse, ModelError>> + Send;
}
