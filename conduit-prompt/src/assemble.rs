//! Prompt assembly (§4.7): a pure function combining memory context, tool
//! context, and user input into a single bounded string.

use conduit_core::guardrail::{
    MAX_COMBINED_INJECT_CHARS, MAX_MEMORY_CONTEXT_CHARS, MAX_TOOL_CONTEXT_CHARS,
};

/// Assemble the user-facing portion of a model request.
///
/// `system_contract` is accepted for signature symmetry with the model
/// backend's expectations and is never embedded in the returned string — the
/// caller places it in the backend's system role directly.
///
/// Budget enforcement, in order:
/// 1. `memory_context` capped at `MAX_MEMORY_CONTEXT_CHARS`.
/// 2. `tool_context` capped at `MAX_TOOL_CONTEXT_CHARS`.
/// 3. Combined length capped at `MAX_COMBINED_INJECT_CHARS`; when over
///    budget, `tool_context` wins and `memory_context` is trimmed first
///    (dropped entirely if no room remains).
pub fn assemble_prompt(
    _system_contract: &str,
    user_input: &str,
    memory_context: Option<&str>,
    tool_context: Option<&str>,
) -> String {
    let mut memory_context = memory_context
        .filter(|s| !s.is_empty())
        .map(|s| truncate_chars(s, MAX_MEMORY_CONTEXT_CHARS));
    let mut tool_context = tool_context
        .filter(|s| !s.is_empty())
        .map(|s| truncate_chars(s, MAX_TOOL_CONTEXT_CHARS));

    let mc_len = memory_context.as_ref().map(|s| s.chars().count()).unwrap_or(0);
    let tc_len = tool_context.as_ref().map(|s| s.chars().count()).unwrap_or(0);

    if mc_len + tc_len > MAX_COMBINED_INJECT_CHARS {
        match (&tool_context, &memory_context) {
            (Some(_), Some(mc)) => {
                let budget = MAX_COMBINED_INJECT_CHARS.saturating_sub(tc_len);
                memory_context = if budget > 0 {
                    Some(truncate_chars(mc, budget))
                } else {
                    None
                };
            }
            (None, Some(mc)) => {
                memory_context = Some(truncate_chars(mc, MAX_COMBINED_INJECT_CHARS));
            }
            (Some(tc), None) => {
                tool_context = Some(truncate_chars(tc, MAX_COMBINED_INJECT_CHARS));
            }
            (None, None) => {}
        }
    }

    let mut parts = Vec::with_capacity(4);
    if let Some(mc) = memory_context.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        parts.push(format!("Memory Context:\n{mc}"));
    }
    if let Some(tc) = tool_context.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        parts.push(format!("Tool Results:\n{tc}"));
    }
    parts.push(format!("User:\n{user_input}"));
    parts.push("Answer:".to_string());

    parts.join("\n\n")
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
