//! The turn state record (§3) and the node delta it is built from.

use crate::id::{ConversationId, TraceId};
use serde::{Deserialize, Serialize};

/// How the turn's raw input arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    /// Free-form text.
    Text,
    /// A reference to audio media.
    Audio,
    /// A reference to image media.
    Image,
}

impl Default for InputType {
    fn default() -> Self {
        InputType::Text
    }
}

/// Output of task-preprocessing (§4.3): the normalized form of the turn's
/// input, carried alongside (not replacing) `raw_input`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessingResult {
    /// Whitespace-trimmed input text.
    pub normalized_text: String,
    /// Input modality, copied from `TurnState::input_type`.
    pub input_type: InputType,
    /// Media reference carried through unchanged.
    pub media_url: Option<String>,
}

/// Status returned by the memory boundary's read operation (§4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryReadStatus {
    /// Data was found and returned.
    Success,
    /// The backend is reachable but holds nothing under the key.
    NotFound,
    /// The backend could not be reached.
    Unavailable,
    /// The request was not authorized by decision-logic.
    Unauthorized,
}

/// Status returned by the memory boundary's write operation (§4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryWriteStatus {
    /// The write was persisted.
    Success,
    /// The write was rejected (e.g. unserializable payload, backend error).
    Failed,
    /// The request was not authorized by decision-logic.
    Unauthorized,
}

/// A structured tool-call directive emitted by the model (§6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallPayload {
    /// Name of the tool the model wants invoked.
    pub name: String,
    /// Arguments for the call, as a JSON object.
    pub arguments: serde_json::Value,
}

/// Whether a model call produced usable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    /// The backend produced output.
    Success,
    /// The backend failed (transport error, timeout, or raised exception
    /// caught at the boundary).
    Error,
}

/// The model backend's response, as recorded on turn state (§4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Outcome of the call.
    pub status: ModelStatus,
    /// Visible text produced by the model (may be empty on error, or may be
    /// the prose preceding a tool-call marker).
    pub output: String,
    /// A tool-call payload, if the model's output carried one. Cleared by
    /// the tool-execution node once consumed.
    pub tool_call: Option<ToolCallPayload>,
}

/// One sanitized (or pre-sanitization raw) search-style result (§4.11, §8
/// property 7). The same shape serves as both the tool client's raw output
/// and the guardrail's sanitized output — sanitization only filters/trims,
/// it never changes the shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title.
    pub title: String,
    /// Source URL; sanitization requires this to start with an http scheme.
    pub url: String,
    /// Snippet text; sanitization truncates this to `MAX_SNIPPET_LEN`.
    pub snippet: String,
}

/// The seven-member closed command set decision-logic routes on (§4.2,
/// GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Run task-preprocessing.
    Preprocess,
    /// Run an authorized memory read.
    MemoryRead,
    /// Call the model backend.
    CallModel,
    /// Execute the tool named in the pending tool-call.
    ExecuteTool,
    /// Run an authorized memory write.
    MemoryWrite,
    /// Format the final response.
    Format,
    /// Terminate the turn.
    End,
}

/// The single record flowing through the graph (§3). Every field not
/// guaranteed present at turn start is `Option`; nodes populate fields by
/// returning a [`StateDelta`], never by mutating a `TurnState` in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnState {
    /// Externally supplied, immutable within the turn.
    pub conversation_id: ConversationId,
    /// Externally supplied; never synthesized by the core.
    pub trace_id: TraceId,
    /// Unix timestamp in milliseconds, stamped at state-init.
    pub created_at: u64,
    /// The user's raw text. May be empty for media-only input.
    pub raw_input: String,
    /// Input modality.
    pub input_type: InputType,
    /// Optional media reference.
    pub media_url: Option<String>,
    /// Normalized input, once task-preprocessing has run.
    pub preprocessing_result: Option<PreprocessingResult>,
    /// Set by decision-logic only; cleared (latched) once memory-read acts on it.
    pub memory_read_authorized: bool,
    /// Set by decision-logic only; cleared (latched) once memory-write acts on it.
    pub memory_write_authorized: bool,
    /// Whether memory-read has been attempted this turn, independent of
    /// outcome — prevents decision-logic from re-entering the branch on a
    /// `not_found`/`unauthorized` result, which leaves `memory_read_result`
    /// null but is not itself a reason to retry.
    pub memory_read_attempted: bool,
    /// Populated by the memory-read node on `success`.
    pub memory_read_result: Option<serde_json::Value>,
    /// Degradation indicator; never reverts from false to true within a turn.
    pub memory_available: bool,
    /// Set by the memory-write node; absent until a write has been attempted.
    pub memory_write_status: Option<MemoryWriteStatus>,
    /// Set by the model-call node.
    pub model_response: Option<ModelResponse>,
    /// Bounded by `MAX_TOOL_CALLS_PER_TURN` at all times.
    pub tool_call_count: u32,
    /// Sanitized results from the most recent tool execution.
    pub tool_results: Option<Vec<SearchResult>>,
    /// Bounded string built from `tool_results` for prompt injection.
    pub tool_context: Option<String>,
    /// Bounded string built from `memory_read_result` for prompt injection.
    pub memory_context: Option<String>,
    /// Decision-logic's most recent routing choice.
    pub command: Option<Command>,
    /// The model's final visible output for this turn.
    pub final_output: Option<String>,
    /// The transport-ready formatted response.
    pub formatted_response: Option<String>,
}

impl TurnState {
    /// Construct the initial state for a turn (the state-init node's output).
    pub fn new(
        conversation_id: ConversationId,
        trace_id: TraceId,
        created_at: u64,
        raw_input: String,
        input_type: InputType,
        media_url: Option<String>,
    ) -> Self {
        Self {
            conversation_id,
            trace_id,
            created_at,
            raw_input,
            input_type,
            media_url,
            preprocessing_result: None,
            memory_read_authorized: false,
            memory_write_authorized: false,
            memory_read_attempted: false,
            memory_read_result: None,
            memory_available: true,
            memory_write_status: None,
            model_response: None,
            tool_call_count: 0,
            tool_results: None,
            tool_context: None,
            memory_context: None,
            command: None,
            final_output: None,
            formatted_response: None,
        }
    }

    /// Apply a delta in place: a `Some` field in `delta` overwrites the
    /// corresponding field here; `None` means "this node did not touch the
    /// field" and the existing value is kept (§3 "Representation").
    pub fn apply(&mut self, delta: StateDelta) {
        if let Some(v) = delta.preprocessing_result {
            self.preprocessing_result = Some(v);
        }
        if let Some(v) = delta.memory_read_authorized {
            self.memory_read_authorized = v;
        }
        if let Some(v) = delta.memory_write_authorized {
            self.memory_write_authorized = v;
        }
        if let Some(v) = delta.memory_read_attempted {
            self.memory_read_attempted = v;
        }
        if let Some(v) = delta.memory_read_result {
            self.memory_read_result = v;
        }
        if let Some(v) = delta.memory_available {
            self.memory_available = self.memory_available && v;
        }
        if let Some(v) = delta.memory_write_status {
            self.memory_write_status = Some(v);
        }
        if let Some(v) = delta.model_response {
            self.model_response = v;
        }
        if let Some(v) = delta.tool_call_count {
            self.tool_call_count = v;
        }
        if let Some(v) = delta.tool_results {
            self.tool_results = v;
        }
        if let Some(v) = delta.tool_context {
            self.tool_context = v;
        }
        if let Some(v) = delta.memory_context {
            self.memory_context = v;
        }
        if let Some(v) = delta.command {
            self.command = Some(v);
        }
        if let Some(v) = delta.final_output {
            self.final_output = Some(v);
        }
        if let Some(v) = delta.formatted_response {
            self.formatted_response = Some(v);
        }
    }
}

/// A partial record a node returns. `None` in any field means "untouched",
/// not "clear it" — see [`TurnState::apply`].
///
/// `Option<Option<T>>` fields (e.g. `memory_read_result`) distinguish "this
/// node did not touch the field" (`None`) from "this node explicitly set it
/// to empty" (`Some(None)`), which plain `Option<T>` cannot express.
#[derive(Debug, Clone, Default)]
pub struct StateDelta {
    /// See `TurnState::preprocessing_result`.
    pub preprocessing_result: Option<PreprocessingResult>,
    /// See `TurnState::memory_read_authorized`.
    pub memory_read_authorized: Option<bool>,
    /// See `TurnState::memory_write_authorized`.
    pub memory_write_authorized: Option<bool>,
    /// See `TurnState::memory_read_attempted`.
    pub memory_read_attempted: Option<bool>,
    /// See `TurnState::memory_read_result`.
    pub memory_read_result: Option<Option<serde_json::Value>>,
    /// See `TurnState::memory_available`. Applied as a logical AND against
    /// the running value so the monotonic-false invariant holds even if a
    /// later node naively returns `true`.
    pub memory_available: Option<bool>,
    /// See `TurnState::memory_write_status`.
    pub memory_write_status: Option<MemoryWriteStatus>,
    /// See `TurnState::model_response`. Nested so tool-execution can clear
    /// a consumed response back to `None` and force decision-logic to
    /// re-enter `call_model` with the fresh `tool_context`.
    pub model_response: Option<Option<ModelResponse>>,
    /// See `TurnState::tool_call_count`.
    pub tool_call_count: Option<u32>,
    /// See `TurnState::tool_results`.
    pub tool_results: Option<Option<Vec<SearchResult>>>,
    /// See `TurnState::tool_context`.
    pub tool_context: Option<Option<String>>,
    /// See `TurnState::memory_context`.
    pub memory_context: Option<Option<String>>,
    /// See `TurnState::command`.
    pub command: Option<Command>,
    /// See `TurnState::final_output`.
    pub final_output: Option<String>,
    /// See `TurnState::formatted_response`.
    pub formatted_response: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> TurnState {
        TurnState::new(
            ConversationId::new("c1"),
            TraceId::new("t1"),
            0,
            "hello".into(),
            InputType::Text,
            None,
        )
    }

    #[test]
    fn apply_none_leaves_field_untouched() {
        let mut s = state();
        s.tool_call_count = 1;
        s.apply(StateDelta::default());
        assert_eq!(s.tool_call_count, 1);
    }

    #[test]
    fn apply_some_overwrites() {
        let mut s = state();
        s.apply(StateDelta {
            tool_call_count: Some(1),
            ..Default::default()
        });
        assert_eq!(s.tool_call_count, 1);
    }

    #[test]
    fn memory_available_is_monotonic_false() {
        let mut s = state();
        s.apply(StateDelta {
            memory_available: Some(false),
            ..Default::default()
        });
        assert!(!s.memory_available);
        s.apply(StateDelta {
            memory_available: Some(true),
            ..Default::default()
        });
        assert!(!s.memory_available, "must not revert false -> true");
    }

    #[test]
    fn nested_option_can_clear_a_field() {
        let mut s = state();
        s.apply(StateDelta {
            tool_context: Some(Some("hi".into())),
            ..Default::default()
        });
        assert_eq!(s.tool_context.as_deref(), Some("hi"));
        s.apply(StateDelta {
            tool_context: Some(None),
            ..Default::default()
        });
        assert_eq!(s.tool_context, None);
    }
}
