//! The seven graph nodes (§4.1, §4.3-§4.7): task-preprocessing, memory-read,
//! model-call, tool-execution, memory-write, and format-response. State-init
//! and decision-logic are not `Node` implementations — state-init is
//! `TurnState::new`, decision-logic is the free function [`crate::decide`].

pub mod format_response;
pub mod memory_read;
pub mod memory_write;
pub mod model_call;
pub mod preprocess;
pub mod tool_execution;

pub use format_response::FormatResponseNode;
pub use memory_read::{MemoryReadNode, MEMORY_KEY};
pub use memory_write::MemoryWriteNode;
pub use model_call::ModelCallNode;
pub use preprocess::PreprocessNode;
pub use tool_execution::ToolExecutionNode;
