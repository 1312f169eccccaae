//! Error taxonomy, mirroring §7: memory, model, tool, tracer, and routing
//! errors are all non-fatal to the turn — none of these are ever allowed to
//! unwind out of a node. They exist so node implementations have a typed
//! vocabulary to report a degraded outcome in the field decision-logic reads.

use thiserror::Error;

/// Errors from the memory boundary (§4.8). Every variant maps to a
/// `MemoryReadStatus`/`MemoryWriteStatus` — none of these propagate past the
/// boundary as a raised error.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MemoryError {
    /// The backing store rejected the request for policy reasons.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The backing store could not be reached.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// The write payload could not be serialized to a portable representation.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// Catch-all for other errors (lock contention, corruption, I/O).
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors from a model backend call (§4.5, §6).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ModelError {
    /// The backend reported a transient or permanent failure.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The backend's response could not be parsed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The call exceeded its configured timeout.
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors from tool execution (§4.6, §4.10).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool registered under the requested name.
    #[error("tool not found: {0}")]
    NotFound(String),

    /// The declared input schema rejected the arguments (missing required
    /// field, wrong type).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Tool execution itself failed.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The call exceeded its configured timeout.
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors raised internally by a tracer backend. Every call site wraps these
/// in an exception-swallowing guard (§4.9 point 2) — a `TracerError` is never
/// allowed to reach the node that emitted the span/event.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TracerError {
    /// The backend could not record the span/event.
    #[error("backend failure: {0}")]
    BackendFailure(String),

    /// A denied metadata key was attempted (recorded as an invariant alarm,
    /// not surfaced to the caller).
    #[error("denied metadata key: {0}")]
    DeniedKey(String),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Orchestrator-level errors. Only `Orchestrator::invoke` (§4.1, §6) may ever
/// return one of these, and only after a best-effort final response has
/// already been produced — per §7's propagation policy, nodes never
/// propagate errors upward.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GraphError {
    /// The node-visit budget was exhausted before reaching format-response.
    #[error("node-visit budget ({0}) exhausted")]
    BudgetExhausted(usize),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
