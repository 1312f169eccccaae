//! `MockBackend`: a deterministic, canned-response backend for tests, in the
//! spirit of the teacher's own test-fixture operators — no network, no
//! nondeterminism.

use crate::marker::extract_tool_call;
use conduit_core::error::ModelError;
use conduit_core::model::{ModelBackend, ModelBackendResponse, ModelRequest};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A backend that cycles through a fixed list of canned raw completions,
/// one per call, wrapping back to the start once exhausted. Each canned
/// string is run through the same `[TOOL_CALL]` marker parsing a real
/// backend would apply to its own output.
pub struct MockBackend {
    responses: Vec<String>,
    next: AtomicUsize,
    calls: Mutex<Vec<ModelRequest>>,
}

impl MockBackend {
    /// Build a backend that always returns `response` verbatim.
    pub fn fixed(response: impl Into<String>) -> Self {
        Self::cycling(vec![response.into()])
    }

    /// Build a backend that returns each of `responses` in turn, then wraps
    /// around.
    pub fn cycling(responses: Vec<String>) -> Self {
        assert!(!responses.is_empty(), "MockBackend needs at least one response");
        Self {
            responses,
            next: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of times `generate` has been called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock backend call log poisoned").len()
    }

    /// Every request this backend has received, in order.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.calls.lock().expect("mock backend call log poisoned").clone()
    }
}

impl ModelBackend for MockBackend {
    fn generate(
        &self,
        request: ModelRequest,
    ) -> impl Future<Output = Result<ModelBackendResponse, ModelError>> + Send {
        let idx = self.next.fetch_add(1, Ordering::SeqCst) % self.responses.len();
        let raw = self.responses[idx].clone();
        self.calls
            .lock()
            .expect("mock backend call log poisoned")
            .push(request);

        async move {
            let (output, tool_call) = extract_tool_call(&raw);
            Ok(ModelBackendResponse {
                output,
                metadata: serde_json::json!({"backend": "mock"}),
                tool_call,
            })
        }
    }
}
