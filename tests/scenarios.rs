//! End-to-end turn scenarios, run black-box through `Orchestrator::invoke`
//! against the quantified invariants and scenario table.

use conduit_core::{ToolDyn, ToolResult, Tracer};
use conduit_graph::{GraphConfig, Orchestrator, TurnStatus};
use conduit_memory::{DisabledMemory, InMemoryMemory};
use conduit_provider::MockBackend;
use conduit_tool::{EchoTool, ToolRegistry};
use conduit_tracer::NoopTracer;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A tool that counts its own invocations, standing in for `web_search` in
/// scenarios that only care how many times a call reached the registry.
struct CountingTool {
    calls: AtomicUsize,
}

impl CountingTool {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

impl ToolDyn for CountingTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "canned search results for tests"
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({"type": "object", "properties": {"query": {"type": "string"}}, "required": ["query"]})
    }

    fn call(
        &self,
        _arguments: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = ToolResult> + Send + '_>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            ToolResult::ok(
                serde_json::json!({"results": [
                    {"title": "Rust 2.0 roadmap", "url": "https://example.com/a", "snippet": "a summary"},
                    {"title": "Async improvements", "url": "https://example.com/b", "snippet": "b summary"},
                    {"title": "Community update", "url": "https://example.com/c", "snippet": "c summary"},
                ]}),
                5,
            )
        })
    }
}

/// Always returns a pending tool-call, never a plain answer — used to drive
/// the tool-call budget against a worst-case model.
struct AlwaysToolCallBackend;

impl conduit_core::ModelBackend for AlwaysToolCallBackend {
    fn generate(
        &self,
        _request: conduit_core::ModelRequest,
    ) -> impl Future<Output = Result<conduit_core::ModelBackendResponse, conduit_core::ModelError>> + Send
    {
        async move {
            Ok(conduit_core::ModelBackendResponse {
                output: String::new(),
                metadata: serde_json::json!({"backend": "always_tool_call"}),
                tool_call: Some(conduit_core::types::ToolCallPayload {
                    name: "web_search".into(),
                    arguments: serde_json::json!({"query": "AI news"}),
                }),
            })
        }
    }
}

/// Records every call it receives but never alters output or control flow,
/// used to check the tracer has zero influence on the turn result.
struct RecordingTracer {
    events: std::sync::Mutex<Vec<String>>,
}

impl RecordingTracer {
    fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl Tracer for RecordingTracer {
    async fn start_span(
        &self,
        name: &str,
        _metadata: serde_json::Value,
        _trace_metadata: &conduit_core::TraceMetadata,
    ) -> conduit_core::SpanHandle {
        self.events.lock().unwrap().push(format!("start:{name}"));
        conduit_core::SpanHandle::new(())
    }

    async fn end_span(
        &self,
        _span: conduit_core::SpanHandle,
        _status: conduit_core::SpanStatus,
        _metadata: serde_json::Value,
    ) {
        self.events.lock().unwrap().push("end".to_string());
    }

    async fn record_event(
        &self,
        name: &str,
        _metadata: serde_json::Value,
        _trace_metadata: &conduit_core::TraceMetadata,
    ) {
        self.events.lock().unwrap().push(format!("event:{name}"));
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Reads succeed normally but every write reports `failed`, isolating the
/// write-failure path from `DisabledMemory`'s read-is-also-unavailable
/// behavior.
struct WriteFailingMemory {
    inner: InMemoryMemory,
}

impl WriteFailingMemory {
    fn new() -> Self {
        Self {
            inner: InMemoryMemory::new(),
        }
    }
}

#[async_trait::async_trait]
impl conduit_core::MemoryBoundary for WriteFailingMemory {
    async fn read(
        &self,
        conversation_id: &conduit_core::ConversationId,
        key: &str,
        authorized: bool,
    ) -> conduit_core::MemoryReadResponse {
        self.inner.read(conversation_id, key, authorized).await
    }

    async fn write(
        &self,
        _conversation_id: &conduit_core::ConversationId,
        _key: &str,
        _data: serde_json::Value,
        _authorized: bool,
    ) -> conduit_core::MemoryWriteResponse {
        conduit_core::MemoryWriteResponse {
            status: conduit_core::types::MemoryWriteStatus::Failed,
            error: Some("simulated write failure".into()),
        }
    }
}

fn echo_registry() -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(EchoTool));
    Arc::new(registry)
}

/// S1: a plain turn with no recall marker and no tool call reaches format
/// with the model's own output, untouched.
#[tokio::test]
async fn s1_plain_turn_returns_model_output_directly() {
    let orch = Orchestrator::new(
        Arc::new(MockBackend::fixed("hi.")),
        Arc::new(InMemoryMemory::new()),
        echo_registry(),
        Arc::new(NoopTracer),
        GraphConfig::default(),
    );
    let outcome = orch.invoke("hello".to_string(), None, None).await;
    assert_eq!(outcome.status, TurnStatus::Ok);
    assert_eq!(outcome.output, "hi.");
}

/// S2: a tool-call marker drives exactly one tool execution and exactly two
/// model calls, ending on the model's synthesis of the tool results.
#[tokio::test]
async fn s2_tool_call_then_synthesis_calls_model_exactly_twice() {
    let backend = Arc::new(MockBackend::cycling(vec![
        r#"[TOOL_CALL]{"name": "web_search", "arguments": {"query": "AI news"}}"#.to_string(),
        "Here's a roundup of the latest AI news.".to_string(),
    ]));
    let tool = Arc::new(CountingTool::new());
    let mut registry = ToolRegistry::new();
    registry.register(tool.clone());

    let orch = Orchestrator::new(
        backend.clone(),
        Arc::new(InMemoryMemory::new()),
        Arc::new(registry),
        Arc::new(NoopTracer),
        GraphConfig::default(),
    );
    let outcome = orch
        .invoke("latest AI news".to_string(), None, None)
        .await;

    assert_eq!(outcome.status, TurnStatus::Ok);
    assert!(!outcome.output.is_empty());
    assert_eq!(outcome.output, "Here's a roundup of the latest AI news.");
    assert_eq!(backend.call_count(), 2);
    assert_eq!(tool.calls.load(Ordering::SeqCst), 1);
}

/// S3 / invariant 1: a backend that always emits a tool-call never drives
/// more than `MAX_TOOL_CALLS_PER_TURN` executions — the guardrail forces
/// the turn to terminate via format regardless.
#[tokio::test]
async fn s3_guardrail_caps_tool_calls_even_against_a_worst_case_backend() {
    let tool = Arc::new(CountingTool::new());
    let mut registry = ToolRegistry::new();
    registry.register(tool.clone());

    let orch = Orchestrator::new(
        Arc::new(AlwaysToolCallBackend),
        Arc::new(InMemoryMemory::new()),
        Arc::new(registry),
        Arc::new(NoopTracer),
        GraphConfig::default(),
    );
    let outcome = orch
        .invoke("latest AI news".to_string(), None, None)
        .await;

    assert_eq!(
        tool.calls.load(Ordering::SeqCst),
        1,
        "tool executed at most once despite the backend always requesting one"
    );
    // The turn still reaches a terminal output rather than looping forever.
    assert!(outcome.output.len() < 10_000);
}

/// S4: a memory backend that fails on write degrades gracefully and leaves
/// `final_output` identical to a run where memory is disabled outright.
#[tokio::test]
async fn s4_failed_memory_write_does_not_change_the_users_answer() {
    let with_failing_memory = Orchestrator::new(
        Arc::new(MockBackend::fixed("Got it, noted.")),
        Arc::new(WriteFailingMemory::new()),
        echo_registry(),
        Arc::new(NoopTracer),
        GraphConfig::default(),
    )
    .invoke("remember I like tea".to_string(), None, None)
    .await;

    let with_disabled_memory = Orchestrator::new(
        Arc::new(MockBackend::fixed("Got it, noted.")),
        Arc::new(DisabledMemory),
        echo_registry(),
        Arc::new(NoopTracer),
        GraphConfig::default(),
    )
    .invoke("remember I like tea".to_string(), None, None)
    .await;

    assert_eq!(with_failing_memory.output, with_disabled_memory.output);
    assert_eq!(with_failing_memory.status, TurnStatus::Ok);
}

/// S5: swapping in a tracer that records every call but never raises an
/// error changes nothing about the turn's outcome, versus a no-op tracer.
#[tokio::test]
async fn s5_tracer_backend_has_no_influence_on_final_output() {
    let with_noop = Orchestrator::new(
        Arc::new(MockBackend::fixed("hi.")),
        Arc::new(InMemoryMemory::new()),
        echo_registry(),
        Arc::new(NoopTracer),
        GraphConfig::default(),
    )
    .invoke("hello".to_string(), None, None)
    .await;

    let recording = Arc::new(RecordingTracer::new());
    let with_recording = Orchestrator::new(
        Arc::new(MockBackend::fixed("hi.")),
        Arc::new(InMemoryMemory::new()),
        echo_registry(),
        recording.clone(),
        GraphConfig::default(),
    )
    .invoke("hello".to_string(), None, None)
    .await;

    assert_eq!(with_noop.output, with_recording.output);
    assert_eq!(with_noop.status, with_recording.status);
    assert!(!recording.events.lock().unwrap().is_empty());
}

/// S6: the same conversational turn with memory on versus off differs only
/// in whether a fact was actually persisted, never in the answer shown.
#[tokio::test]
async fn s6_memory_on_or_off_produces_the_same_answer() {
    let memory_on = Arc::new(InMemoryMemory::new());
    let on_outcome = Orchestrator::new(
        Arc::new(MockBackend::fixed("Got it, I'll remember that.")),
        memory_on.clone(),
        echo_registry(),
        Arc::new(NoopTracer),
        GraphConfig::default(),
    )
    .invoke("remember I like tea".to_string(), None, None)
    .await;

    let off_outcome = Orchestrator::new(
        Arc::new(MockBackend::fixed("Got it, I'll remember that.")),
        Arc::new(DisabledMemory),
        echo_registry(),
        Arc::new(NoopTracer),
        GraphConfig::default(),
    )
    .invoke("remember I like tea".to_string(), None, None)
    .await;

    assert_eq!(on_outcome.output, off_outcome.output);

    let stored = memory_on
        .read(
            &conduit_core::ConversationId::new(on_outcome.conversation_id.as_str()),
            conduit_graph::nodes::MEMORY_KEY,
            true,
        )
        .await;
    assert_eq!(stored.status, conduit_core::types::MemoryReadStatus::Success);
}

/// Invariant 4: the caller-supplied `trace_id` is echoed back verbatim,
/// never synthesized over.
#[tokio::test]
async fn invariant_caller_supplied_trace_id_is_never_overwritten() {
    let orch = Orchestrator::new(
        Arc::new(MockBackend::fixed("ok")),
        Arc::new(InMemoryMemory::new()),
        echo_registry(),
        Arc::new(NoopTracer),
        GraphConfig::default(),
    );
    let trace_id = conduit_core::TraceId::new("trace-abc-123");
    let outcome = orch
        .invoke("hello".to_string(), None, Some(trace_id.clone()))
        .await;
    assert_eq!(outcome.trace_id, trace_id);
}

/// Invariant 6: an unauthorized memory read never reaches the backing
/// store — exercised here via a plain greeting, which never warrants
/// recall and therefore never authorizes a read at all.
#[tokio::test]
async fn invariant_unrelated_turns_never_touch_memory() {
    let memory = Arc::new(InMemoryMemory::new());
    let orch = Orchestrator::new(
        Arc::new(MockBackend::fixed("hi.")),
        memory.clone(),
        echo_registry(),
        Arc::new(NoopTracer),
        GraphConfig::default(),
    );
    orch.invoke("hello".to_string(), None, None).await;

    let conv = conduit_core::ConversationId::new("probe");
    let resp = memory
        .read(&conv, conduit_graph::nodes::MEMORY_KEY, true)
        .await;
    assert_eq!(resp.status, conduit_core::types::MemoryReadStatus::NotFound);
}

/// Degraded status is surfaced to the caller when the model backend errors
/// outright, while still returning a user-facing fallback string rather
/// than propagating an error.
#[tokio::test]
async fn model_backend_failure_degrades_the_turn_but_still_answers() {
    struct AlwaysFailingBackend;
    impl conduit_core::ModelBackend for AlwaysFailingBackend {
        fn generate(
            &self,
            _request: conduit_core::ModelRequest,
        ) -> impl Future<Output = Result<conduit_core::ModelBackendResponse, conduit_core::ModelError>>
               + Send {
            async move { Err(conduit_core::ModelError::RequestFailed("boom".into())) }
        }
    }

    let orch = Orchestrator::new(
        Arc::new(AlwaysFailingBackend),
        Arc::new(InMemoryMemory::new()),
        echo_registry(),
        Arc::new(NoopTracer),
        GraphConfig::default(),
    );
    let outcome = orch.invoke("hello".to_string(), None, None).await;
    assert_eq!(outcome.status, TurnStatus::Degraded);
    assert!(!outcome.output.is_empty());
}
