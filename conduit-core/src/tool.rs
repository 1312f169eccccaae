//! The tool contract (§4.10): an object-safe, non-throwing, schema-validated
//! unit of external capability. Tools never see turn state and never touch
//! the memory boundary.

use std::future::Future;
use std::pin::Pin;

/// Result of a single tool invocation. Tools never throw — every failure
/// mode (bad arguments, execution failure, timeout observed by the caller)
/// surfaces as `success: false` with an `error` string.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolResult {
    /// Whether the call succeeded.
    pub success: bool,
    /// Result payload. Empty object on failure.
    pub data: serde_json::Value,
    /// Error description, present when `success` is false.
    pub error: Option<String>,
    /// Wall-clock execution time in milliseconds.
    pub execution_time_ms: u64,
}

impl ToolResult {
    /// Build a successful result.
    pub fn ok(data: serde_json::Value, execution_time_ms: u64) -> Self {
        Self {
            success: true,
            data,
            error: None,
            execution_time_ms,
        }
    }

    /// Build a failed result.
    pub fn fail(error: impl Into<String>, execution_time_ms: u64) -> Self {
        Self {
            success: false,
            data: serde_json::json!({}),
            error: Some(error.into()),
            execution_time_ms,
        }
    }
}

/// Object-safe tool trait (§4.10). Stored as `Arc<dyn ToolDyn>` in the
/// registry; mirrors the teacher's `ToolDyn` shape exactly, since that shape
/// already satisfies every invariant this spec names for tools.
pub trait ToolDyn: Send + Sync {
    /// The tool's unique name.
    fn name(&self) -> &str;

    /// Human-readable, model-facing description.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's input: field descriptors plus a required
    /// list.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool. Implementations validate `arguments` against their
    /// declared schema themselves and return `ToolResult{success: false}`
    /// on any failure rather than panicking or returning `Err`.
    fn call(
        &self,
        arguments: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = ToolResult> + Send + '_>>;
}
