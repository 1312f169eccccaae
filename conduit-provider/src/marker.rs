//! The `[TOOL_CALL]{...}` marker convention (§4.5, §6): backends parse their
//! own raw completion text for the marker before handing a
//! `ModelBackendResponse` back to the caller, so every backend — mock or
//! real — produces the same shape regardless of how its underlying API
//! represents tool calls.

use conduit_core::types::ToolCallPayload;

const MARKER: &str = "[TOOL_CALL]";

/// Scan `raw` for the `[TOOL_CALL]` marker and, if present, brace-count from
/// the first `{` after it to find the end of the JSON object. Returns the
/// visible text (everything before the marker, trimmed) and the parsed
/// payload, if the captured span parses as an object with a string `name`
/// and an object `arguments`.
///
/// A marker with no valid JSON object after it, or a JSON object missing
/// either field, degrades to plain text: the marker and its trailing garbage
/// are left in `visible` untouched, and no tool call is returned. The model
/// call itself never fails because of a malformed marker.
pub fn extract_tool_call(raw: &str) -> (String, Option<ToolCallPayload>) {
    let Some(marker_pos) = raw.find(MARKER) else {
        return (raw.to_string(), None);
    };

    let after_marker = &raw[marker_pos + MARKER.len()..];
    let Some(brace_start) = after_marker.find('{') else {
        return (raw.to_string(), None);
    };

    let Some(json_span) = take_balanced_braces(&after_marker[brace_start..]) else {
        return (raw.to_string(), None);
    };

    let Ok(value) = serde_json::from_str::<serde_json::Value>(json_span) else {
        return (raw.to_string(), None);
    };

    let (Some(name), Some(arguments)) = (
        value.get("name").and_then(|v| v.as_str()),
        value.get("arguments").filter(|v| v.is_object()),
    ) else {
        return (raw.to_string(), None);
    };

    let visible = raw[..marker_pos].trim().to_string();
    (
        visible,
        Some(ToolCallPayload {
            name: name.to_string(),
            arguments: arguments.clone(),
        }),
    )
}

/// Return the shortest prefix of `s` that starts at its first `{` and ends
/// at the matching closing brace, counting nesting depth. `None` if the
/// braces never balance before the string ends.
fn take_balanced_braces(s: &str) -> Option<&str> {
    let mut depth = 0i32;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_marker_returns_raw_text_unchanged() {
        let (visible, call) = extract_tool_call("just an answer");
        assert_eq!(visible, "just an answer");
        assert!(call.is_none());
    }

    #[test]
    fn parses_a_well_formed_marker() {
        let raw = r#"[TOOL_CALL]{"name": "web_search", "arguments": {"query": "rust news"}}"#;
        let (visible, call) = extract_tool_call(raw);
        assert_eq!(visible, "");
        let call = call.unwrap();
        assert_eq!(call.name, "web_search");
        assert_eq!(call.arguments["query"], "rust news");
    }

    #[test]
    fn keeps_prose_before_the_marker_as_visible_output() {
        let raw = r#"Sure, let me check.
[TOOL_CALL]{"name": "web_search", "arguments": {"query": "x"}}"#;
        let (visible, call) = extract_tool_call(raw);
        assert_eq!(visible, "Sure, let me check.");
        assert!(call.is_some());
    }

    #[test]
    fn tolerates_trailing_prose_after_the_json_object() {
        let raw = r#"[TOOL_CALL]{"name": "web_search", "arguments": {"query": "x"}} please wait"#;
        let (_, call) = extract_tool_call(raw);
        assert!(call.is_some());
    }

    #[test]
    fn handles_nested_braces_in_arguments() {
        let raw = r#"[TOOL_CALL]{"name": "t", "arguments": {"filter": {"nested": true}}}"#;
        let (_, call) = extract_tool_call(raw);
        let call = call.unwrap();
        assert_eq!(call.arguments["filter"]["nested"], true);
    }

    #[test]
    fn malformed_json_after_marker_degrades_to_plain_text() {
        let raw = "[TOOL_CALL]{not valid json";
        let (visible, call) = extract_tool_call(raw);
        assert_eq!(visible, raw);
        assert!(call.is_none());
    }

    #[test]
    fn missing_name_field_degrades_to_plain_text() {
        let raw = r#"[TOOL_CALL]{"arguments": {"query": "x"}}"#;
        let (visible, call) = extract_tool_call(raw);
        assert_eq!(visible, raw);
        assert!(call.is_none());
    }

    #[test]
    fn arguments_must_be_an_object() {
        let raw = r#"[TOOL_CALL]{"name": "t", "arguments": "not an object"}"#;
        let (_, call) = extract_tool_call(raw);
        assert!(call.is_none());
    }

    #[test]
    fn marker_with_no_brace_at_all_degrades_to_plain_text() {
        let raw = "[TOOL_CALL] I didn't actually call anything";
        let (visible, call) = extract_tool_call(raw);
        assert_eq!(visible, raw);
        assert!(call.is_none());
    }
}
