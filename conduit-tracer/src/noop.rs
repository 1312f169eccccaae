//! The default, always-available tracer backend (§4.9 point 4).

use async_trait::async_trait;
use conduit_core::{SpanHandle, SpanStatus, TraceMetadata, Tracer};

/// A tracer that does nothing. Used whenever no backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

#[async_trait]
impl Tracer for NoopTracer {
    async fn start_span(
        &self,
        _name: &str,
        _metadata: serde_json::Value,
        _trace_metadata: &TraceMetadata,
    ) -> SpanHandle {
        SpanHandle::new(())
    }

    async fn end_span(&self, _span: SpanHandle, _status: SpanStatus, _metadata: serde_json::Value) {}

    async fn record_event(
        &self,
        _name: &str,
        _metadata: serde_json::Value,
        _trace_metadata: &TraceMetadata,
    ) {
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_core::{ConversationId, TraceId};

    #[tokio::test]
    async fn noop_is_disabled_and_silent() {
        let tracer = NoopTracer;
        assert!(!tracer.is_enabled());
        let meta = TraceMetadata {
            trace_id: TraceId::new("t"),
            conversation_id: ConversationId::new("c"),
            user_id: None,
        };
        let span = tracer.start_span("x", serde_json::json!({}), &meta).await;
        tracer.end_span(span, SpanStatus::Ok, serde_json::json!({})).await;
        tracer.record_event("y", serde_json::json!({}), &meta).await;
    }
}
