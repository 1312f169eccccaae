//! `HttpChatBackend`: a generic chat-completion client for any
//! OpenAI-compatible `/chat/completions` endpoint (the shape Ollama and most
//! self-hosted model servers share), in the builder style of the teacher's
//! provider clients.

use crate::marker::extract_tool_call;
use conduit_core::error::ModelError;
use conduit_core::model::{ModelBackend, ModelBackendResponse, ModelRequest};
use std::future::Future;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Chat-completion client for an OpenAI-compatible `/api/chat` endpoint.
///
/// # Example
///
/// ```no_run
/// use conduit_provider::HttpChatBackend;
///
/// let backend = HttpChatBackend::new()
///     .model("llama3")
///     .base_url("http://localhost:11434");
/// ```
pub struct HttpChatBackend {
    base_url: String,
    model: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpChatBackend {
    /// Build a client with sensible defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            client: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the default model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

impl Default for HttpChatBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBackend for HttpChatBackend {
    fn generate(
        &self,
        request: ModelRequest,
    ) -> impl Future<Output = Result<ModelBackendResponse, ModelError>> + Send {
        let url = self.chat_url();
        let model = self.model.clone();
        let http_client = self.client.clone();
        let timeout = self.timeout;

        async move {
            let body = serde_json::json!({
                "model": model,
                "stream": false,
                "messages": [
                    {"role": "system", "content": request.system_prompt},
                    {"role": "user", "content": request.prompt},
                ],
            });

            tracing::debug!(url = %url, %model, task = %request.task, "sending model request");

            let response = http_client
                .post(&url)
                .timeout(timeout)
                .json(&body)
                .send()
                .await
                .map_err(|e| ModelError::RequestFailed(e.to_string()))?;

            let status = response.status();
            if status.as_u16() == 429 {
                return Err(ModelError::RequestFailed("rate limited".to_string()));
            }
            let response_text = response
                .text()
                .await
                .map_err(|e| ModelError::RequestFailed(e.to_string()))?;

            if !status.is_success() {
                return Err(ModelError::RequestFailed(format!(
                    "status {status}: {response_text}"
                )));
            }

            let json: serde_json::Value = serde_json::from_str(&response_text)
                .map_err(|e| ModelError::InvalidResponse(format!("invalid JSON: {e}")))?;

            let raw_content = json
                .get("message")
                .and_then(|m| m.get("content"))
                .and_then(|c| c.as_str())
                .ok_or_else(|| {
                    ModelError::InvalidResponse("missing message.content".to_string())
                })?;

            let (output, tool_call) = extract_tool_call(raw_content);
            Ok(ModelBackendResponse {
                output,
                metadata: serde_json::json!({"backend": "http_chat", "model": model}),
                tool_call,
            })
        }
    }
}
