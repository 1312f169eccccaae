//! The tracer interface (§4.9): fail-silent spans/events that never generate
//! identifiers and never influence control flow.

use crate::id::{ConversationId, TraceId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Immutable carrier of correlation identifiers, always supplied by the
/// caller. The tracer never constructs one of these itself (§4.9 point 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceMetadata {
    /// Correlates all spans/events for one turn.
    pub trace_id: TraceId,
    /// The conversation the turn belongs to.
    pub conversation_id: ConversationId,
    /// Optional end-user identifier, never required.
    pub user_id: Option<String>,
}

/// Outcome recorded when a span ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanStatus {
    /// The span's unit of work completed normally.
    Ok,
    /// The span's unit of work ended in a (non-fatal, already-handled) error.
    Error,
}

/// An opaque handle returned by `start_span`. Backends stash whatever they
/// need (a `tracing::Span`, an id, nothing at all) inside; callers only ever
/// pass it back to `end_span`.
pub struct SpanHandle(Box<dyn Any + Send + Sync>);

impl SpanHandle {
    /// Wrap an arbitrary backend-specific value as an opaque span handle.
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Recover the backend-specific value, if the caller knows its type.
    pub fn downcast<T: 'static>(self) -> Option<T> {
        self.0.downcast::<T>().ok().map(|b| *b)
    }
}

/// Protocol ②: fail-silent spans/events (§4.9).
///
/// Every method here must be infallible from the caller's perspective —
/// implementations report their own failures (e.g. as an invariant alarm),
/// they never return an error for a caller to propagate. §4.9 point 2
/// requires every call site to additionally wrap calls in an
/// exception-swallowing guard; this trait's contract is the other half of
/// that defense, since `tracing`-crate panics or backend bugs should not
/// reach here in the first place.
#[async_trait]
pub trait Tracer: Send + Sync {
    /// Begin a span named `name`. `metadata` must already be deny-list safe
    /// by the time it reaches a backend (§4.9 point 3).
    async fn start_span(
        &self,
        name: &str,
        metadata: serde_json::Value,
        trace_metadata: &TraceMetadata,
    ) -> SpanHandle;

    /// End a previously started span.
    async fn end_span(&self, span: SpanHandle, status: SpanStatus, metadata: serde_json::Value);

    /// Record a standalone event not associated with a span.
    async fn record_event(
        &self,
        name: &str,
        metadata: serde_json::Value,
        trace_metadata: &TraceMetadata,
    );

    /// Whether this backend is actually recording anything.
    fn is_enabled(&self) -> bool;
}
