#![deny(missing_docs)]
//! # conduit — umbrella crate
//!
//! A single import surface for the conduit agent runtime. Re-exports the
//! protocol and implementation crates behind feature flags, plus a
//! `prelude` for the common path: build an [`prelude::Orchestrator`] from a
//! memory boundary, a tool registry, a tracer, and a model backend.

#[cfg(feature = "core")]
pub use conduit_core;
#[cfg(feature = "core")]
pub use conduit_graph;
#[cfg(feature = "core")]
pub use conduit_memory;
#[cfg(feature = "core")]
pub use conduit_prompt;
#[cfg(feature = "core")]
pub use conduit_tool;
#[cfg(feature = "provider")]
pub use conduit_provider;
#[cfg(feature = "tracer")]
pub use conduit_tracer;

/// Happy-path imports for composing a conduit runtime.
pub mod prelude {
    #[cfg(feature = "core")]
    pub use conduit_core::{
        Command, ConversationId, InputType, MemoryBoundary, ModelBackend, Node, SearchResult,
        ToolDyn, ToolResult, TraceId, Tracer, TurnState,
    };

    #[cfg(feature = "core")]
    pub use conduit_memory::{DisabledMemory, InMemoryMemory, PersistentMemory};

    #[cfg(feature = "core")]
    pub use conduit_tool::{EchoTool, ToolRegistry, WebSearchTool};

    #[cfg(feature = "core")]
    pub use conduit_graph::{GraphConfig, Orchestrator, TurnOutcome, TurnStatus};

    #[cfg(feature = "tracer")]
    pub use conduit_tracer::{InvariantAlarm, NoopTracer, StructuredTracer};

    #[cfg(feature = "provider")]
    pub use conduit_provider::{HttpChatBackend, MockBackend};
}
