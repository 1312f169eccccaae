//! A `tracing`-crate-backed tracer enforcing the deny-list (§4.9 point 3).

use crate::alarm::InvariantAlarm;
use async_trait::async_trait;
use conduit_core::{SpanHandle, SpanStatus, TraceMetadata, Tracer};
use std::sync::Arc;

/// Metadata keys a `StructuredTracer` will never forward to its backend —
/// raw prompts, full outputs, and anything credential-shaped. The core only
/// ever passes structural fields (counts, statuses, node names, durations);
/// this list exists to catch a future call site that forgets that rule.
const DENY_LIST: &[&str] = &["prompt", "raw_output", "output", "credentials", "api_key", "authorization"];

/// Emits `tracing::info_span!`/`tracing::event!` calls carrying only the
/// caller-supplied `trace_metadata` plus deny-list-filtered structural
/// metadata.
pub struct StructuredTracer {
    alarm: Arc<InvariantAlarm>,
}

impl StructuredTracer {
    /// Create a new structured tracer with its own invariant-alarm counter.
    pub fn new() -> Self {
        Self {
            alarm: Arc::new(InvariantAlarm::new()),
        }
    }

    /// Create a structured tracer sharing an invariant-alarm counter with
    /// another component (e.g. so a caller can inspect alarms raised across
    /// several tracers).
    pub fn with_alarm(alarm: Arc<InvariantAlarm>) -> Self {
        Self { alarm }
    }

    /// The shared invariant-alarm counter, for tests and diagnostics.
    pub fn alarm(&self) -> &Arc<InvariantAlarm> {
        &self.alarm
    }

    /// Drop any denied key from `metadata`, recording one invariant-alarm
    /// event per drop, and return the filtered object as a displayable
    /// string (the `tracing` macros want `Value`/`Display`, not arbitrary
    /// JSON, so this is rendered once here rather than per-field).
    fn filtered(&self, metadata: &serde_json::Value) -> serde_json::Value {
        let Some(obj) = metadata.as_object() else {
            return metadata.clone();
        };
        let mut out = serde_json::Map::new();
        for (k, v) in obj {
            if DENY_LIST.contains(&k.as_str()) {
                self.alarm.record(format!("denied metadata key: {k}"));
                continue;
            }
            out.insert(k.clone(), v.clone());
        }
        serde_json::Value::Object(out)
    }
}

impl Default for StructuredTracer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tracer for StructuredTracer {
    async fn start_span(
        &self,
        name: &str,
        metadata: serde_json::Value,
        trace_metadata: &TraceMetadata,
    ) -> SpanHandle {
        let metadata = self.filtered(&metadata);
        let span = tracing::info_span!(
            "conduit_span",
            node = %name,
            trace_id = %trace_metadata.trace_id,
            conversation_id = %trace_metadata.conversation_id,
            user_id = trace_metadata.user_id.as_deref().unwrap_or(""),
            metadata = %metadata,
        );
        SpanHandle::new(span)
    }

    async fn end_span(&self, span: SpanHandle, status: SpanStatus, metadata: serde_json::Value) {
        let metadata = self.filtered(&metadata);
        if let Some(span) = span.downcast::<tracing::Span>() {
            let _enter = span.enter();
            match status {
                SpanStatus::Ok => tracing::info!(%metadata, "span completed"),
                SpanStatus::Error => tracing::warn!(%metadata, "span completed with error"),
            }
        }
    }

    async fn record_event(
        &self,
        name: &str,
        metadata: serde_json::Value,
        trace_metadata: &TraceMetadata,
    ) {
        let metadata = self.filtered(&metadata);
        tracing::info!(
            event = %name,
            trace_id = %trace_metadata.trace_id,
            conversation_id = %trace_metadata.conversation_id,
            user_id = trace_metadata.user_id.as_deref().unwrap_or(""),
            metadata = %metadata,
            "conduit event"
        );
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_core::{ConversationId, TraceId};

    fn trace_meta() -> TraceMetadata {
        TraceMetadata {
            trace_id: TraceId::new("t1"),
            conversation_id: ConversationId::new("c1"),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn denied_keys_are_dropped_and_alarmed() {
        let tracer = StructuredTracer::new();
        let meta = trace_meta();
        tracer
            .record_event(
                "model_call_attempted",
                serde_json::json!({"prompt": "secret", "status": "ok"}),
                &meta,
            )
            .await;
        assert_eq!(tracer.alarm().count(), 1);
        assert_eq!(tracer.alarm().recent(), vec!["denied metadata key: prompt"]);
    }

    #[tokio::test]
    async fn structured_tracer_is_enabled() {
        assert!(StructuredTracer::new().is_enabled());
    }

    #[tokio::test]
    async fn span_lifecycle_does_not_panic() {
        let tracer = StructuredTracer::new();
        let meta = trace_meta();
        let span = tracer
            .start_span("model_call_node", serde_json::json!({"attempt": 1}), &meta)
            .await;
        tracer
            .end_span(span, SpanStatus::Ok, serde_json::json!({"duration_ms": 12}))
            .await;
    }
}
