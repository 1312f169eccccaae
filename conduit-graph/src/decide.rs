//! Decision-logic (§4.2): a pure, deterministic function from state to the
//! next command. Never touches memory contents or performs I/O — it routes
//! on presence/absence and status flags only.

use conduit_core::types::{Command, TurnState};

/// Backward-reference markers that make memory recall worth attempting.
/// Case-insensitive substring match against `raw_input`. A documented,
/// testable stand-in for "recall is warranted by input content" — the one
/// open question the distilled contract left to the reimplementer.
const RECALL_MARKERS: &[&str] = &[
    "remember",
    "earlier",
    "before",
    "last time",
    "you said",
    "we discussed",
];

/// Whether memory recall is worth attempting for this turn: either the
/// input text references past context, or the input isn't text at all (a
/// non-text turn has nothing fresh to reason from in isolation).
pub fn recall_warranted(state: &TurnState) -> bool {
    if state.input_type != conduit_core::types::InputType::Text {
        return true;
    }
    let lower = state.raw_input.to_lowercase();
    RECALL_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// A fact worth persisting to memory: here, any turn where the model
/// produced a non-empty visible output and the input itself carried a
/// recall marker (the user told us something, not just asked something).
/// Mirrors `recall_warranted`'s structure so read and write share one
/// documented notion of "this turn is about memory".
fn produced_a_fact_worth_persisting(state: &TurnState) -> bool {
    let has_output = state
        .model_response
        .as_ref()
        .map(|r| !r.output.trim().is_empty())
        .unwrap_or(false);
    has_output && recall_warranted(state)
}

/// Select the next command by examining `state` in the fixed six-step
/// priority order (§4.2). Decision-logic both reads and writes `command`,
/// `memory_read_authorized`, and `memory_write_authorized` — this function
/// returns the full picture as a `StateDelta`-shaped tuple for the
/// orchestrator to apply before dispatching.
pub fn decide(state: &TurnState) -> conduit_core::types::StateDelta {
    use conduit_core::types::StateDelta;

    if state.preprocessing_result.is_none() {
        return StateDelta {
            command: Some(Command::Preprocess),
            ..Default::default()
        };
    }

    if state.memory_read_result.is_none()
        && !state.memory_read_attempted
        && recall_warranted(state)
    {
        return StateDelta {
            command: Some(Command::MemoryRead),
            memory_read_authorized: Some(true),
            ..Default::default()
        };
    }

    // Past this point memory-read, if it ran at all, has already consumed
    // its authorization — clear the latch so a stale `true` can't leak into
    // a later branch that never meant to request a read.
    if state.model_response.is_none() {
        return StateDelta {
            command: Some(Command::CallModel),
            memory_read_authorized: Some(false),
            ..Default::default()
        };
    }

    let tool_call_pending = state
        .model_response
        .as_ref()
        .and_then(|r| r.tool_call.as_ref())
        .is_some();
    if tool_call_pending && state.tool_call_count < conduit_core::guardrail::MAX_TOOL_CALLS_PER_TURN
    {
        return StateDelta {
            command: Some(Command::ExecuteTool),
            memory_read_authorized: Some(false),
            memory_write_authorized: Some(false),
            ..Default::default()
        };
    }

    if state.memory_write_status.is_none() && produced_a_fact_worth_persisting(state) {
        return StateDelta {
            command: Some(Command::MemoryWrite),
            memory_read_authorized: Some(false),
            memory_write_authorized: Some(true),
            ..Default::default()
        };
    }

    StateDelta {
        command: Some(Command::Format),
        memory_read_authorized: Some(false),
        memory_write_authorized: Some(false),
        ..Default::default()
    }
}
