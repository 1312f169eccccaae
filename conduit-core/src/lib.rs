#![deny(missing_docs)]
//! # conduit-core
//!
//! The data model and trait boundaries shared by every other `conduit-*`
//! crate: the turn state record, typed ids, the command enum, the guardrail
//! policy, and the `Node`/`Tracer`/`MemoryBoundary`/`ToolDyn`/`ModelBackend`
//! protocol traits. Nothing in this crate performs I/O — it defines the
//! contracts that crates downstream implement.

pub mod error;
pub mod guardrail;
pub mod id;
pub mod memory;
pub mod model;
pub mod node;
pub mod tool;
pub mod tracer;
pub mod types;

pub use error::{GraphError, MemoryError, ModelError, TracerError, ToolError};
pub use guardrail::GuardrailViolation;
pub use id::{ConversationId, TraceId};
pub use memory::{MemoryBoundary, MemoryReadResponse, MemoryWriteResponse};
pub use model::{ModelBackend, ModelBackendResponse, ModelRequest};
pub use node::Node;
pub use tool::{ToolDyn, ToolResult};
pub use tracer::{SpanHandle, SpanStatus, TraceMetadata, Tracer};
pub use types::{
    Command, InputType, MemoryReadStatus, MemoryWriteStatus, ModelResponse, ModelStatus,
    PreprocessingResult, SearchResult, StateDelta, ToolCallPayload, TurnState,
};
