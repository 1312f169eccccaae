//! Static configuration for an [`crate::Orchestrator`] instance, grounded on
//! the teacher's `ReactConfig` (one struct of tunables, `Default` supplying
//! the spec's published constants).

use conduit_core::guardrail::{DEFAULT_TOOL_CALL_TIMEOUT, MAX_NODE_VISITS_PER_TURN};
use std::time::Duration;

/// Tunables for a running graph. All fields have defaults matching the
/// external-interface constants (§6); callers only override what they need.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Max nodes visited in a single turn before format-response is forced
    /// with a degraded output (§4.1).
    pub max_node_visits: usize,
    /// Wall-clock budget for a single tool invocation.
    pub tool_call_timeout: Duration,
    /// Wall-clock budget for a single model-backend call.
    pub model_call_timeout: Duration,
    /// Wall-clock budget for a single memory-boundary call (read or write).
    pub memory_call_timeout: Duration,
    /// Addendum appended to the fixed system contract for every turn this
    /// orchestrator runs (e.g. product-specific tone guidance).
    pub system_addendum: Option<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_node_visits: MAX_NODE_VISITS_PER_TURN,
            tool_call_timeout: DEFAULT_TOOL_CALL_TIMEOUT,
            model_call_timeout: Duration::from_secs(30),
            memory_call_timeout: Duration::from_secs(30),
            system_addendum: None,
        }
    }
}

impl GraphConfig {
    /// Override the node-visit budget.
    #[must_use]
    pub fn max_node_visits(mut self, n: usize) -> Self {
        self.max_node_visits = n;
        self
    }

    /// Override the tool-call timeout.
    #[must_use]
    pub fn tool_call_timeout(mut self, d: Duration) -> Self {
        self.tool_call_timeout = d;
        self
    }

    /// Override the model-call timeout.
    #[must_use]
    pub fn model_call_timeout(mut self, d: Duration) -> Self {
        self.model_call_timeout = d;
        self
    }

    /// Override the memory-call timeout.
    #[must_use]
    pub fn memory_call_timeout(mut self, d: Duration) -> Self {
        self.memory_call_timeout = d;
        self
    }

    /// Set a system-prompt addendum.
    #[must_use]
    pub fn system_addendum(mut self, addendum: impl Into<String>) -> Self {
        self.system_addendum = Some(addendum.into());
        self
    }
}
