//! The `Node` trait (§2, §3): one responsibility each, reads state, returns a
//! delta. Object-safe via `async_trait` — the orchestrator holds a
//! `HashMap<&str, Arc<dyn Node>>` routing table (§4.1).

use crate::types::{StateDelta, TurnState};
use async_trait::async_trait;

/// A single unit of work in the graph. Nodes are conceptually pure functions
/// from state to delta; any I/O they perform (model call, memory call, tool
/// call) is caught internally and translated into delta fields rather than
/// propagated as an error (§7 propagation policy).
#[async_trait]
pub trait Node: Send + Sync {
    /// The node's canonical name, used for trace spans (§6) and the routing
    /// table (§4.1).
    fn name(&self) -> &'static str;

    /// Read `state` and return the fields this node changed.
    async fn run(&self, state: &TurnState) -> StateDelta;
}
