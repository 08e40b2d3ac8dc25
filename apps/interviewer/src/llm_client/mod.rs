//! Completion client: the single point of entry for calls to the remote
//! chat-completion endpoint.
//!
//! No other module builds HTTP requests to the endpoint. Agents go through
//! `agents::AgentRunner`, which sits on top of a `CompletionBackend`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod prompts;

/// Model id sent when the configuration does not name one.
pub const DEFAULT_MODEL: &str = "openai";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Remote { status: u16, body: String },

    #[error("Malformed response body: {0}")]
    Decode(String),

    #[error("Structured arguments are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Completion returned neither content nor a tool call")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A single named function the model may call, with its JSON-Schema parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

/// Transport-independent request handed to a `CompletionBackend`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub tool: Option<ToolSpec>,
    pub seed: Option<u64>,
}

/// What the endpoint answered with.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Parsed arguments of the requested tool call.
    Structured(Value),
    /// Free-text message content.
    Text(String),
}

/// Anything that can answer a `CompletionRequest`. `LlmClient` is the HTTP
/// implementation; tests plug in scripted backends.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ClientError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire format
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: &'a ToolSpec,
}

impl<'a> WireRequest<'a> {
    fn from_request(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            messages: &request.messages,
            tools: request.tool.as_ref().map(|function| {
                vec![WireTool {
                    kind: "function",
                    function,
                }]
            }),
            tool_choice: request.tool.as_ref().map(|_| "auto"),
            seed: request.seed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    content: Option<String>,
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    function: WireFunctionCall,
}

#[derive(Debug, Deserialize)]
struct WireFunctionCall {
    name: Option<String>,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

/// Picks the structured arguments when a tool was requested and called,
/// otherwise the text content.
fn interpret_response(
    response: WireResponse,
    tool: Option<&ToolSpec>,
) -> Result<Completion, ClientError> {
    let Some(message) = response.choices.into_iter().next().map(|c| c.message) else {
        return Err(ClientError::EmptyContent);
    };

    if let Some(tool) = tool {
        let calls = message.tool_calls.unwrap_or_default();
        // Prefer the call naming our tool; fall back to the first one.
        let chosen = calls
            .iter()
            .find(|c| c.function.name.as_deref() == Some(tool.name))
            .or_else(|| calls.first());
        if let Some(call) = chosen {
            let arguments: Value = serde_json::from_str(&call.function.arguments)?;
            return Ok(Completion::Structured(arguments));
        }
    }

    match message.content {
        Some(text) if !text.trim().is_empty() => Ok(Completion::Text(text)),
        _ => Err(ClientError::EmptyContent),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP client
// ────────────────────────────────────────────────────────────────────────────

/// HTTP client for an OpenAI-style `/chat/completions` endpoint.
/// One POST per call, no retries.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ClientError> {
        let body = WireRequest::from_request(request);

        let mut builder = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Remote {
                status: status.as_u16(),
                body: text,
            });
        }

        let wire: WireResponse =
            serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))?;

        if let Some(usage) = &wire.usage {
            debug!(
                "Completion succeeded: prompt_tokens={:?}, completion_tokens={:?}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        interpret_response(wire, request.tool.as_ref())
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::json;

    fn sample_tool() -> ToolSpec {
        ToolSpec {
            name: "detect_mismatch",
            description: "Checks for role mismatch.",
            parameters: json!({"type": "object", "properties": {}}),
        }
    }

    fn request(tool: Option<ToolSpec>) -> CompletionRequest {
        CompletionRequest {
            model: DEFAULT_MODEL.to_string(),
            messages: vec![ChatMessage::user("hello")],
            tool,
            seed: None,
        }
    }

    /// Serves `router` on an ephemeral loopback port and returns its URL.
    async fn spawn_endpoint(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/openai")
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  [1, 2]  ";
        assert_eq!(strip_json_fences(input), "[1, 2]");
    }

    #[test]
    fn test_wire_request_omits_tools_in_text_mode() {
        let req = request(None);
        let value = serde_json::to_value(WireRequest::from_request(&req)).unwrap();
        assert_eq!(value["model"], "openai");
        assert_eq!(value["messages"][0]["role"], "user");
        assert!(value.get("tools").is_none());
        assert!(value.get("tool_choice").is_none());
        assert!(value.get("seed").is_none());
    }

    #[test]
    fn test_wire_request_with_tool_and_seed() {
        let mut req = request(Some(sample_tool()));
        req.seed = Some(23);
        let value = serde_json::to_value(WireRequest::from_request(&req)).unwrap();
        assert_eq!(value["tools"][0]["type"], "function");
        assert_eq!(value["tools"][0]["function"]["name"], "detect_mismatch");
        assert_eq!(value["tool_choice"], "auto");
        assert_eq!(value["seed"], 23);
    }

    #[test]
    fn test_interpret_tool_call_arguments() {
        let wire: WireResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": null, "tool_calls": [
                {"function": {"name": "detect_mismatch", "arguments": "{\"mismatchNote\":\"none\"}"}}
            ]}}]
        }))
        .unwrap();
        let completion = interpret_response(wire, Some(&sample_tool())).unwrap();
        assert_eq!(
            completion,
            Completion::Structured(json!({"mismatchNote": "none"}))
        );
    }

    #[test]
    fn test_interpret_falls_back_to_content_without_tool_call() {
        let wire: WireResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "No mismatch."}}]
        }))
        .unwrap();
        let completion = interpret_response(wire, Some(&sample_tool())).unwrap();
        assert_eq!(completion, Completion::Text("No mismatch.".to_string()));
    }

    #[test]
    fn test_interpret_malformed_arguments_is_parse_error() {
        let wire: WireResponse = serde_json::from_value(json!({
            "choices": [{"message": {"tool_calls": [
                {"function": {"name": "detect_mismatch", "arguments": "{not json"}}
            ]}}]
        }))
        .unwrap();
        let err = interpret_response(wire, Some(&sample_tool())).unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[test]
    fn test_interpret_empty_choices() {
        let wire: WireResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        let err = interpret_response(wire, None).unwrap_err();
        assert!(matches!(err, ClientError::EmptyContent));
    }

    #[tokio::test]
    async fn test_http_non_success_status_is_remote_error() {
        let router = Router::new().route(
            "/openai",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        );
        let client = LlmClient::new(spawn_endpoint(router).await, None);

        let err = client.complete(&request(None)).await.unwrap_err();
        match err {
            ClientError::Remote { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_tool_call_round_trip() {
        let router = Router::new().route(
            "/openai",
            post(|Json(body): Json<Value>| async move {
                // Echo the requested tool name back as a tool call.
                let name = body["tools"][0]["function"]["name"].clone();
                Json(json!({
                    "choices": [{"message": {"tool_calls": [
                        {"function": {"name": name, "arguments": "{\"mismatchNote\":\"\"}"}}
                    ]}}],
                    "usage": {"prompt_tokens": 12, "completion_tokens": 4}
                }))
            }),
        );
        let client = LlmClient::new(spawn_endpoint(router).await, Some("secret".to_string()));

        let completion = client.complete(&request(Some(sample_tool()))).await.unwrap();
        assert_eq!(completion, Completion::Structured(json!({"mismatchNote": ""})));
    }

    #[tokio::test]
    async fn test_http_malformed_body_is_decode_error() {
        let router = Router::new().route("/openai", post(|| async { "this is not json" }));
        let client = LlmClient::new(spawn_endpoint(router).await, None);

        let err = client.complete(&request(None)).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_http_unreachable_endpoint_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = LlmClient::new(format!("http://{addr}/openai"), None);

        let err = client.complete(&request(None)).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
