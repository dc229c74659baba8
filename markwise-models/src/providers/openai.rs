//! OpenAI-compatible chat completion provider.
//!
//! Works against any endpoint that speaks the `/chat/completions` dialect
//! (OpenAI, OpenRouter, Groq, vLLM, llama.cpp server, ...).
//!
//! # Example
//!
//! ```ignore
//! use markwise_models::providers::{OpenAiCompatProvider, OpenAiConfig};
//!
//! let provider = OpenAiCompatProvider::new(OpenAiConfig::new("https://openrouter.ai/api/v1"))?;
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::{ChatRequest, ChatResponse, ResponseFormat, Role, StopReason, Usage};
use crate::auth::ApiKey;
use crate::{Error, Result};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ────────────────────────────────────────────────────────────────────────────
// Wire Types
// ────────────────────────────────────────────────────────────────────────────

/// Message in an OpenAI chat request/response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Request body for `/chat/completions`.
#[derive(Debug, Serialize)]
pub struct OpenAiChatRequest {
    pub model: String,
    pub messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<serde_json::Value>,
}

impl From<ChatRequest> for OpenAiChatRequest {
    fn from(request: ChatRequest) -> Self {
        let messages = request
            .messages
            .into_iter()
            .map(|m| OpenAiMessage {
                role: match m.role {
                    Role::System => "system".to_string(),
                    Role::User => "user".to_string(),
                    Role::Assistant => "assistant".to_string(),
                },
                content: Some(m.content),
            })
            .collect();

        let response_format = request.response_format.and_then(|format| match format {
            ResponseFormat::Text => None,
            ResponseFormat::JsonObject => Some(json!({ "type": "json_object" })),
            ResponseFormat::JsonSchema { name, schema } => Some(json!({
                "type": "json_schema",
                "json_schema": { "name": name, "schema": schema, "strict": true }
            })),
        });

        Self {
            model: request.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format,
        }
    }
}

/// One completion choice.
#[derive(Debug, Deserialize)]
pub struct OpenAiChoice {
    pub message: OpenAiMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token accounting as reported by the API.
#[derive(Debug, Deserialize)]
pub struct OpenAiUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

/// Response from `/chat/completions`.
#[derive(Debug, Deserialize)]
pub struct OpenAiChatResponse {
    #[serde(default)]
    pub choices: Vec<OpenAiChoice>,
    #[serde(default)]
    pub usage: Option<OpenAiUsage>,
}

impl OpenAiChatResponse {
    /// Convert the first choice into a [`ChatResponse`].
    pub fn into_chat_response(self) -> Result<ChatResponse> {
        let usage = self
            .usage
            .map(|u| Usage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let choice = self.choices.into_iter().next().ok_or(Error::EmptyResponse)?;
        let content = choice
            .message
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(Error::EmptyResponse)?;

        Ok(ChatResponse {
            content,
            stop_reason: StopReason::from_finish_reason(choice.finish_reason.as_deref()),
            usage,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAiCompatProvider
// ────────────────────────────────────────────────────────────────────────────

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API base URL, without the trailing `/chat/completions`.
    pub base_url: String,
    /// Bearer token; local servers often need none.
    pub api_key: Option<ApiKey>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Name reported by [`ModelProvider::name`](super::ModelProvider::name).
    pub provider_name: String,
}

impl OpenAiConfig {
    /// Settings for `base_url` with no key and the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            provider_name: "openai".to_string(),
        }
    }

    /// Attach an API key.
    pub fn with_api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the provider name.
    pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = name.into();
        self
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Provider speaking the OpenAI chat-completions protocol over HTTP.
pub struct OpenAiCompatProvider {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a provider with its own HTTP client.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Request(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Get the base URL for this provider.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Perform a chat completion request.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = self.completions_url();
        let body = OpenAiChatRequest::from(request);
        debug!(model = %body.model, url = %url, "sending chat completion request");

        let mut builder = self.client.post(&url).json(&body);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ProviderApi(format!(
                "chat completion returned {}: {}",
                status, body
            )));
        }

        let parsed: OpenAiChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;

        parsed.into_chat_response()
    }
}

#[async_trait::async_trait]
impl super::ModelProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.config.provider_name
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.chat(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{Message, ModelProvider};

    #[test]
    fn config_defaults() {
        let config = OpenAiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.provider_name, "openai");
    }

    #[test]
    fn completions_url_ignores_trailing_slash() {
        let provider =
            OpenAiCompatProvider::new(OpenAiConfig::new("https://openrouter.ai/api/v1/")).unwrap();
        assert_eq!(
            provider.completions_url(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn provider_name_is_configurable() {
        let provider = OpenAiCompatProvider::new(
            OpenAiConfig::new("http://localhost:8000/v1").with_provider_name("openrouter"),
        )
        .unwrap();
        assert_eq!(ModelProvider::name(&provider), "openrouter");
    }

    // ────────────────────────────────────────────────────────────────────────────
    // Wire Format Tests
    // ────────────────────────────────────────────────────────────────────────────

    #[test]
    fn request_serializes_json_schema_format() {
        let request = ChatRequest::new(
            "gpt-4o-mini",
            vec![Message::system("grade"), Message::user("answer")],
        )
        .temperature(0.1)
        .response_format(ResponseFormat::JsonSchema {
            name: "semantic_result".to_string(),
            schema: json!({ "type": "object" }),
        });

        let body = serde_json::to_value(OpenAiChatRequest::from(request)).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "answer");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "semantic_result");
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn text_format_is_omitted() {
        let request = ChatRequest::new("m", vec![Message::user("hi")])
            .max_tokens(100)
            .response_format(ResponseFormat::Text);
        let body = serde_json::to_value(OpenAiChatRequest::from(request)).unwrap();
        assert!(body.get("response_format").is_none());
        assert_eq!(body["max_tokens"], 100);
    }

    #[test]
    fn parse_chat_response_extracts_content() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "  You're close!  " },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49 }
        }"#;

        let parsed: OpenAiChatResponse = serde_json::from_str(json).unwrap();
        let response = parsed.into_chat_response().unwrap();

        assert_eq!(response.content, "You're close!");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.total_tokens, 49);
    }

    #[test]
    fn empty_choices_is_empty_response() {
        let parsed: OpenAiChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(parsed.into_chat_response(), Err(Error::EmptyResponse)));
    }

    #[test]
    fn null_content_is_empty_response() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": null}, "finish_reason": "length"}]}"#;
        let parsed: OpenAiChatResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(parsed.into_chat_response(), Err(Error::EmptyResponse)));
    }

    // ────────────────────────────────────────────────────────────────────────────
    // Integration Tests (require a reachable endpoint)
    // ────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    #[ignore = "requires OPENAI_API_KEY and network access"]
    async fn integration_chat_round_trip() {
        let Ok(key) = std::env::var("OPENAI_API_KEY") else {
            eprintln!("Skipping: OPENAI_API_KEY not set");
            return;
        };
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let provider =
            OpenAiCompatProvider::new(OpenAiConfig::new(base_url).with_api_key(ApiKey::new(key)))
                .unwrap();
        let request = ChatRequest::new(
            "gpt-4o-mini",
            vec![Message::user("Say 'hello' and nothing else.")],
        );

        let response = provider.chat(request).await.expect("chat should succeed");
        assert!(!response.content.is_empty());
    }
}
