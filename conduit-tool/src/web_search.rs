//! `WebSearchTool` (§4.11): a multi-provider semantic web search client.
//!
//! Provider priority is Exa → Brave → Linkup — the first provider with a
//! configured API key wins. The tool never raises: every transport, auth, or
//! parse failure collapses into a single `ToolResult { success: false }`.

use conduit_core::guardrail::sanitize_results;
use conduit_core::types::SearchResult;
use conduit_core::{ToolDyn, ToolResult};
use serde_json::{json, Value};
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

struct ProviderConfig {
    name: &'static str,
    base_url: &'static str,
    query_param: &'static str,
    api_key_env: &'static str,
    tool_name: &'static str,
}

const PROVIDERS: &[ProviderConfig] = &[
    ProviderConfig {
        name: "exa",
        base_url: "https://exa.run.tools",
        query_param: "exaApiKey",
        api_key_env: "EXA_API_KEY",
        tool_name: "web_search_exa",
    },
    ProviderConfig {
        name: "brave",
        base_url: "https://brave.run.tools",
        query_param: "braveApiKey",
        api_key_env: "BRAVE_API_KEY",
        tool_name: "brave_web_search",
    },
    ProviderConfig {
        name: "linkup",
        base_url: "https://linkup-mcp-server--linkupplatform.run.tools",
        query_param: "apiKey",
        api_key_env: "LINKUP_API_KEY",
        tool_name: "linkup-search",
    },
];

fn credential_for(cfg: &ProviderConfig) -> Option<String> {
    std::env::var(cfg.api_key_env)
        .ok()
        .filter(|v| !v.is_empty() && !v.starts_with("your_"))
}

/// Web search over a semantic-search MCP-style endpoint, with automatic
/// provider fallback based on which API key is present in the environment.
pub struct WebSearchTool {
    client: reqwest::Client,
    timeout: Duration,
    /// Overrides provider resolution entirely — tests inject a mock base URL
    /// here so no real provider needs to be reachable.
    base_url_override: Option<String>,
}

impl WebSearchTool {
    /// Build a tool that resolves its provider from the environment at call
    /// time.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
            base_url_override: None,
        }
    }

    /// Build a tool that always posts to `base_url`, bypassing provider
    /// resolution and credential checks. For tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
            base_url_override: Some(base_url.into()),
        }
    }

    fn active_provider(&self) -> Option<(&'static ProviderConfig, String)> {
        PROVIDERS
            .iter()
            .find_map(|cfg| credential_for(cfg).map(|key| (cfg, key)))
    }

    fn target_url(&self) -> Option<(String, &'static str)> {
        if let Some(base) = &self.base_url_override {
            let tool_name = PROVIDERS[0].tool_name;
            return Some((base.clone(), tool_name));
        }
        let (cfg, key) = self.active_provider()?;
        let url = format!("{}?{}={}", cfg.base_url, cfg.query_param, key);
        Some((url, cfg.tool_name))
    }
}

impl Default for WebSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolDyn for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for current information. Returns a short list of titled, linked snippets."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "Search query (min 3 chars)"},
                "max_results": {"type": "integer", "minimum": 1, "maximum": 5, "default": 3},
            },
            "required": ["query"],
        })
    }

    fn call(&self, arguments: Value) -> Pin<Box<dyn Future<Output = ToolResult> + Send + '_>> {
        Box::pin(async move {
            let start = Instant::now();

            let Some(query) = arguments.get("query").and_then(|v| v.as_str()) else {
                return ToolResult::fail(
                    "missing required field: query",
                    start.elapsed().as_millis() as u64,
                );
            };
            if query.chars().count() < 3 {
                return ToolResult::fail(
                    "query must be at least 3 characters",
                    start.elapsed().as_millis() as u64,
                );
            }
            let max_results = arguments
                .get("max_results")
                .and_then(|v| v.as_u64())
                .map(|n| n.clamp(1, 5) as usize)
                .unwrap_or(3);

            let Some((url, tool_name)) = self.target_url() else {
                tracing::warn!(reason = "missing_credentials", "web_search unavailable");
                return ToolResult::fail(
                    "no search provider credentials configured",
                    start.elapsed().as_millis() as u64,
                );
            };

            let payload = json!({
                "jsonrpc": "2.0",
                "method": "tools/call",
                "params": {"name": tool_name, "arguments": {"query": query, "numResults": max_results}},
                "id": 1,
            });

            tracing::debug!(url = %url, %query, "sending web search request");

            let response = match self
                .client
                .post(&url)
                .timeout(self.timeout)
                .header("Accept", "application/json, text/event-stream")
                .json(&payload)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(reason = "transport_error", error = %e, "web_search failed");
                    return ToolResult::fail(
                        format!("request failed: {e}"),
                        start.elapsed().as_millis() as u64,
                    );
                }
            };

            if !response.status().is_success() {
                let status = response.status();
                tracing::warn!(reason = "http_error", %status, "web_search failed");
                return ToolResult::fail(
                    format!("provider returned status {status}"),
                    start.elapsed().as_millis() as u64,
                );
            }

            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            let body = match response.text().await {
                Ok(b) => b,
                Err(e) => {
                    return ToolResult::fail(
                        format!("failed to read response body: {e}"),
                        start.elapsed().as_millis() as u64,
                    );
                }
            };

            let rpc_data = parse_response(&content_type, &body);
            let raw_results = extract_results(&rpc_data, max_results);
            let sanitized = sanitize_results(&raw_results);

            let elapsed = start.elapsed().as_millis() as u64;
            ToolResult::ok(
                json!({
                    "results": sanitized.iter().map(|r| json!({
                        "title": r.title, "url": r.url, "snippet": r.snippet,
                    })).collect::<Vec<_>>()
                }),
                elapsed,
            )
        })
    }
}

/// Parse the HTTP body as JSON-RPC. SSE bodies are parsed line by line,
/// keeping the last parseable `data:` payload; everything else is parsed as
/// plain JSON, falling back to SSE parsing if that fails.
fn parse_response(content_type: &str, body: &str) -> Value {
    if content_type.contains("text/event-stream") {
        return parse_sse(body);
    }
    serde_json::from_str(body).unwrap_or_else(|_| parse_sse(body))
}

fn parse_sse(text: &str) -> Value {
    let mut last = Value::Null;
    for line in text.lines() {
        if let Some(payload) = line.strip_prefix("data:") {
            let payload = payload.trim();
            if payload.is_empty() || payload == "[DONE]" {
                continue;
            }
            if let Ok(v) = serde_json::from_str::<Value>(payload) {
                last = v;
            }
        }
    }
    last
}

/// Pull a result list out of a JSON-RPC `tools/call` envelope, handling every
/// provider's response shape plus a generic fallback.
fn extract_results(rpc_data: &Value, max_results: usize) -> Vec<SearchResult> {
    let result = match rpc_data.get("result") {
        Some(r) => r,
        None => return Vec::new(),
    };
    if result.get("isError").and_then(|v| v.as_bool()).unwrap_or(false) {
        return Vec::new();
    }

    let content = match result.get("content").and_then(|v| v.as_array()) {
        Some(c) => c,
        None => return Vec::new(),
    };

    for item in content {
        if item.get("type").and_then(|v| v.as_str()) != Some("text") {
            continue;
        }
        let text = item.get("text").and_then(|v| v.as_str()).unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }

        if let Some(parsed) = try_parse_json_results(text, max_results) {
            return parsed;
        }

        return vec![SearchResult {
            title: "Search Result".to_string(),
            url: String::new(),
            snippet: text.chars().take(300).collect(),
        }];
    }

    Vec::new()
}

/// One of the provider-specific response shapes a search result payload can
/// take, discriminated by which top-level key is present.
enum ResultShape {
    TopLevelResults(Vec<Value>),
    NestedWebResults(Vec<Value>),
    NestedSources(Vec<Value>),
    SingleAnswer(String),
    Generic(Vec<Value>),
}

fn classify(data: &Value) -> Option<ResultShape> {
    let obj = data.as_object()?;
    if let Some(results) = obj.get("results").and_then(|v| v.as_array()) {
        return Some(ResultShape::TopLevelResults(results.clone()));
    }
    if let Some(web) = obj.get("web").and_then(|v| v.as_object()) {
        let results = web.get("results").and_then(|v| v.as_array()).cloned().unwrap_or_default();
        return Some(ResultShape::NestedWebResults(results));
    }
    if let Some(sources) = obj.get("sources").and_then(|v| v.as_array()) {
        return Some(ResultShape::NestedSources(sources.clone()));
    }
    if let Some(answer) = obj.get("answer").and_then(|v| v.as_str()) {
        return Some(ResultShape::SingleAnswer(answer.to_string()));
    }
    if let Some(items) = obj.get("items").and_then(|v| v.as_array()) {
        return Some(ResultShape::Generic(items.clone()));
    }
    if let Some(organic) = obj.get("organic").and_then(|v| v.as_array()) {
        return Some(ResultShape::Generic(organic.clone()));
    }
    if let Some(pages) = obj
        .get("webPages")
        .and_then(|v| v.get("value"))
        .and_then(|v| v.as_array())
    {
        return Some(ResultShape::Generic(pages.clone()));
    }
    Some(ResultShape::Generic(vec![data.clone()]))
}

fn try_parse_json_results(text: &str, max_results: usize) -> Option<Vec<SearchResult>> {
    let data: Value = serde_json::from_str(text).ok()?;

    let items = match data {
        Value::Array(ref arr) => arr.clone(),
        Value::Object(_) => match classify(&data)? {
            ResultShape::TopLevelResults(v) => v,
            ResultShape::NestedWebResults(v) => v,
            ResultShape::NestedSources(v) => v,
            ResultShape::SingleAnswer(answer) => {
                vec![json!({"title": "Answer", "url": "", "snippet": answer})]
            }
            ResultShape::Generic(v) => v,
        },
        _ => return Some(Vec::new()),
    };

    let out = items
        .into_iter()
        .take(max_results)
        .filter_map(|item| {
            let obj = item.as_object()?;
            let title = obj
                .get("title")
                .or_else(|| obj.get("name"))
                .and_then(|v| v.as_str())
                .unwrap_or("Result")
                .to_string();
            let url = obj
                .get("url")
                .or_else(|| obj.get("link"))
                .or_else(|| obj.get("href"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            let snippet = obj
                .get("snippet")
                .or_else(|| obj.get("description"))
                .or_else(|| obj.get("text"))
                .or_else(|| obj.get("body"))
                .or_else(|| obj.get("content"))
                .or_else(|| obj.get("summary"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            Some(SearchResult { title, url, snippet })
        })
        .collect();

    Some(out)
}
