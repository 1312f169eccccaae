//! Guardrail policy (§4's "Guardrail policy" component, §6 constants table).
//!
//! Stateless, pure functions bounding tool call counts and the size of
//! anything injected back into a prompt. Every constant here is an external
//! contract (§6) — tools and model backends are written against these exact
//! values.

use crate::types::SearchResult;
use std::time::Duration;
use thiserror::Error;

/// Max tool calls allowed per turn.
pub const MAX_TOOL_CALLS_PER_TURN: u32 = 1;
/// Max sanitized results kept from a single tool call.
pub const MAX_RESULTS: usize = 5;
/// Max characters kept per result snippet.
pub const MAX_SNIPPET_LEN: usize = 300;
/// Max combined characters across a sanitized result list.
pub const MAX_TOTAL_CHARS: usize = 1500;
/// Max characters in the formatted tool context string.
pub const MAX_TOOL_CONTEXT_CHARS: usize = 2048;
/// Max characters in the memory context string.
pub const MAX_MEMORY_CONTEXT_CHARS: usize = 2048;
/// Max combined characters of memory + tool context injected into a prompt.
pub const MAX_COMBINED_INJECT_CHARS: usize = 1500;
/// Max graph nodes visited in a single turn before forced termination.
pub const MAX_NODE_VISITS_PER_TURN: usize = 25;
/// Default timeout for a single tool invocation.
pub const DEFAULT_TOOL_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Raised by a guardrail check. Non-fatal by design: callers catch this and
/// continue the turn along a degraded path — it is never allowed to abort a
/// node.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("guardrail violation[{rule}]: {detail}")]
pub struct GuardrailViolation {
    /// Which rule was violated, e.g. `"MAX_TOOL_CALLS_PER_TURN"`.
    pub rule: &'static str,
    /// Human-readable detail.
    pub detail: String,
}

/// Enforce at most `MAX_TOOL_CALLS_PER_TURN` tool calls in a turn.
pub fn check_tool_call_limit(tool_call_count: u32) -> Result<(), GuardrailViolation> {
    if tool_call_count >= MAX_TOOL_CALLS_PER_TURN {
        return Err(GuardrailViolation {
            rule: "MAX_TOOL_CALLS_PER_TURN",
            detail: format!(
                "tool call limit ({MAX_TOOL_CALLS_PER_TURN}) already reached this turn"
            ),
        });
    }
    Ok(())
}

/// Bound a raw result list per §8 property 7: every URL starts with an http
/// scheme, every snippet is truncated to `MAX_SNIPPET_LEN`, at most
/// `MAX_RESULTS` entries survive, and the combined character budget across
/// title+url+snippet never exceeds `MAX_TOTAL_CHARS`.
pub fn sanitize_results(results: &[SearchResult]) -> Vec<SearchResult> {
    let mut sanitized = Vec::new();
    let mut total_chars = 0usize;

    for result in results.iter().take(MAX_RESULTS) {
        if !result.url.starts_with("http") {
            continue;
        }

        let snippet = truncate_chars(&result.snippet, MAX_SNIPPET_LEN);
        let item_chars = result.title.chars().count() + result.url.chars().count()
            + snippet.chars().count();
        if total_chars + item_chars > MAX_TOTAL_CHARS {
            break;
        }
        total_chars += item_chars;

        sanitized.push(SearchResult {
            title: result.title.clone(),
            url: result.url.clone(),
            snippet,
        });
    }

    sanitized
}

/// Format a sanitized result list into a bounded context string suitable for
/// prompt injection (§4.6 step 5, §4.7).
pub fn format_tool_context(results: &[SearchResult], max_chars: usize) -> String {
    if results.is_empty() {
        return String::new();
    }

    let mut lines = vec!["Web search results:".to_string()];
    for (i, r) in results.iter().enumerate() {
        lines.push(format!("{}. {} — {}", i + 1, r.title, r.snippet));
    }

    let context = lines.join("\n");
    truncate_chars(&context, max_chars)
}

/// Format a memory-read result into a bounded context string suitable for
/// prompt injection (§4.4, §4.7). `value` is whatever the memory boundary
/// returned on `success`; absence is the caller's responsibility to check
/// before calling this.
pub fn format_memory_context(value: &serde_json::Value, max_chars: usize) -> String {
    let rendered = match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    truncate_chars(&format!("Remembered: {rendered}"), max_chars)
}

/// Truncate a string to at most `max_chars` Unicode scalar values, never
/// splitting a multi-byte character.
fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str, url: &str, snippet: &str) -> SearchResult {
        SearchResult {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }

    #[test]
    fn tool_call_limit_allows_zero_rejects_at_max() {
        assert!(check_tool_call_limit(0).is_ok());
        assert!(check_tool_call_limit(1).is_err());
        assert!(check_tool_call_limit(5).is_err());
    }

    #[test]
    fn sanitize_drops_non_http_urls() {
        let raw = vec![result("a", "ftp://x", "s"), result("b", "http://x", "s")];
        let out = sanitize_results(&raw);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "b");
    }

    #[test]
    fn sanitize_truncates_snippets() {
        let long = "x".repeat(MAX_SNIPPET_LEN + 50);
        let raw = vec![result("a", "http://x", &long)];
        let out = sanitize_results(&raw);
        assert_eq!(out[0].snippet.chars().count(), MAX_SNIPPET_LEN);
    }

    #[test]
    fn sanitize_caps_result_count() {
        let raw: Vec<_> = (0..10)
            .map(|i| result(&format!("t{i}"), "http://x", "s"))
            .collect();
        let out = sanitize_results(&raw);
        assert_eq!(out.len(), MAX_RESULTS);
    }

    #[test]
    fn sanitize_stops_at_total_char_budget() {
        let long = "x".repeat(600);
        let raw = vec![
            result("a", "http://one", &long),
            result("b", "http://two", &long),
            result("c", "http://three", &long),
        ];
        let out = sanitize_results(&raw);
        let total: usize = out
            .iter()
            .map(|r| r.title.chars().count() + r.url.chars().count() + r.snippet.chars().count())
            .sum();
        assert!(total <= MAX_TOTAL_CHARS);
        assert!(out.len() < raw.len());
    }

    #[test]
    fn format_tool_context_empty_is_empty_string() {
        assert_eq!(format_tool_context(&[], MAX_TOOL_CONTEXT_CHARS), "");
    }

    #[test]
    fn format_memory_context_wraps_a_string_value() {
        let out = format_memory_context(&serde_json::json!("likes tea"), MAX_MEMORY_CONTEXT_CHARS);
        assert_eq!(out, "Remembered: likes tea");
    }

    #[test]
    fn format_memory_context_respects_max_chars() {
        let long = serde_json::json!("x".repeat(200));
        let out = format_memory_context(&long, 20);
        assert_eq!(out.chars().count(), 20);
    }

    #[test]
    fn format_tool_context_respects_max_chars() {
        let raw: Vec<_> = (0..5)
            .map(|i| result(&format!("t{i}"), "http://x", &"y".repeat(100)))
            .collect();
        let out = format_tool_context(&raw, 50);
        assert_eq!(out.chars().count(), 50);
    }
}
