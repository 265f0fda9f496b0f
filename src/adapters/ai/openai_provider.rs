//! OpenAI-compatible client - Implementation of CompletionClient.
//!
//! Talks to any `/chat/completions` endpoint that speaks the OpenAI wire
//! format. The default configuration targets OpenRouter.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("openai/gpt-4o-mini")
//!     .with_timeout(Duration::from_secs(15));
//!
//! let client = OpenAIClient::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{
    CompletionClient, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage, UpstreamError,
};

/// Configuration for the OpenAI-compatible client.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "openai/gpt-4o-mini").
    pub model: String,
    /// Base URL for the API (default: https://openrouter.ai/api/v1).
    pub base_url: String,
    /// Hard limit for one call, connect through body.
    pub timeout: Duration,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sent as `HTTP-Referer` (OpenRouter app attribution).
    pub referer: Option<String>,
    /// Sent as `X-Title` (OpenRouter app attribution).
    pub app_title: Option<String>,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "openai/gpt-4o-mini".to_string(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            timeout: Duration::from_secs(15),
            temperature: 0.5,
            max_tokens: 500,
            referer: None,
            app_title: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the attribution headers sent with every call.
    pub fn with_attribution(mut self, referer: impl Into<String>, title: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self.app_title = Some(title.into());
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI-compatible chat-completion client.
pub struct OpenAIClient {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// `Network` if the HTTP client cannot be built (e.g. TLS backend failure).
    pub fn new(config: OpenAIConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| UpstreamError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Converts our request to the wire format.
    fn to_chat_request(&self, request: &CompletionRequest) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(request.system_prompt.clone()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(request.user_message.clone()),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    fn timeout_error(&self) -> UpstreamError {
        UpstreamError::Timeout {
            timeout_secs: self.config.timeout.as_secs(),
        }
    }

    fn classify_transport_error(&self, e: reqwest::Error) -> UpstreamError {
        if e.is_timeout() {
            self.timeout_error()
        } else if e.is_connect() {
            UpstreamError::network(format!("Connection failed: {}", e))
        } else {
            UpstreamError::network(e.to_string())
        }
    }
}

/// Maps a non-success status to an error.
fn status_error(status: StatusCode, body: String) -> UpstreamError {
    match status.as_u16() {
        401 | 403 => UpstreamError::AuthenticationFailed,
        429 => UpstreamError::RateLimited,
        code => UpstreamError::status(code, body),
    }
}

/// Decodes a completion body and extracts the first choice.
fn parse_completion(body: &str, fallback_model: &str) -> Result<CompletionResponse, UpstreamError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| UpstreamError::parse(format!("Failed to parse response: {}", e)))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(UpstreamError::EmptyResponse)?;

    let content = choice
        .message
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or(UpstreamError::EmptyResponse)?;

    let usage = response
        .usage
        .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
        .unwrap_or_default();

    Ok(CompletionResponse {
        content,
        usage,
        model: response.model.unwrap_or_else(|| fallback_model.to_string()),
        finish_reason: FinishReason::from_provider(choice.finish_reason.as_deref()),
    })
}

#[async_trait]
impl CompletionClient for OpenAIClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, UpstreamError> {
        let body = self.to_chat_request(&request);

        let mut call = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(&body);
        if let Some(ref referer) = self.config.referer {
            call = call.header("HTTP-Referer", referer);
        }
        if let Some(ref title) = self.config.app_title {
            call = call.header("X-Title", title);
        }

        tracing::debug!(
            model = %self.config.model,
            trace_id = %request.metadata.trace_id,
            "sending chat completion"
        );

        let response = call
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        if !status.is_success() {
            return Err(status_error(status, text));
        }

        parse_completion(&text, &self.config.model)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai-compatible", &self.config.model)
    }
}

// ----- Wire Types -----

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::ports::RequestMetadata;
    use axum::routing::post;
    use axum::{Json, Router};

    fn request() -> CompletionRequest {
        CompletionRequest::new(
            "You are a coach",
            "hi",
            RequestMetadata::new(UserId::new("u1").unwrap(), "trace-1"),
        )
    }

    /// Serves `router` on an ephemeral port and returns its base URL.
    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn config_builder_works() {
        let config = OpenAIConfig::new("test-key")
            .with_model("openai/gpt-4o")
            .with_base_url("https://custom.api.com/v1/")
            .with_timeout(Duration::from_secs(5))
            .with_temperature(0.2)
            .with_max_tokens(100)
            .with_attribution("http://localhost:5173", "AI Fitness Coach");

        assert_eq!(config.model, "openai/gpt-4o");
        assert_eq!(config.base_url, "https://custom.api.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_tokens, 100);
        assert_eq!(config.referer.as_deref(), Some("http://localhost:5173"));
        assert_eq!(config.app_title.as_deref(), Some("AI Fitness Coach"));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn config_defaults_match_deployment_profile() {
        let config = OpenAIConfig::new("k");
        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert_eq!(config.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.max_tokens, 500);
    }

    #[test]
    fn request_body_carries_system_then_user() {
        let client = OpenAIClient::new(OpenAIConfig::new("k")).unwrap();
        let body = serde_json::to_value(client.to_chat_request(&request())).unwrap();

        assert_eq!(body["model"], "openai/gpt-4o-mini");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are a coach");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "hi");
    }

    #[test]
    fn parse_completion_extracts_first_choice() {
        let body = r#"{"model":"openai/gpt-4o-mini","choices":[{"message":{"role":"assistant","content":"💪 Today's Focus"},"finish_reason":"stop"}],"usage":{"prompt_tokens":10,"completion_tokens":5}}"#;
        let response = parse_completion(body, "fallback").unwrap();

        assert_eq!(response.content, "💪 Today's Focus");
        assert_eq!(response.model, "openai/gpt-4o-mini");
        assert_eq!(response.usage.total_tokens, 15);
        assert_eq!(response.finish_reason, FinishReason::Stop);
    }

    #[test]
    fn parse_completion_rejects_empty_bodies() {
        let no_choices = r#"{"choices":[]}"#;
        assert!(matches!(
            parse_completion(no_choices, "m"),
            Err(UpstreamError::EmptyResponse)
        ));

        let null_content = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert!(matches!(
            parse_completion(null_content, "m"),
            Err(UpstreamError::EmptyResponse)
        ));

        let blank = r#"{"choices":[{"message":{"role":"assistant","content":"  "}}]}"#;
        assert!(matches!(parse_completion(blank, "m"), Err(UpstreamError::EmptyResponse)));
    }

    #[test]
    fn parse_completion_rejects_malformed_json() {
        assert!(matches!(
            parse_completion("<html>oops</html>", "m"),
            Err(UpstreamError::Parse(_))
        ));
    }

    #[test]
    fn status_errors_are_classified() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, String::new()),
            UpstreamError::AuthenticationFailed
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, String::new()),
            UpstreamError::RateLimited
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "upstream".to_string()),
            UpstreamError::Status { status: 502, .. }
        ));
    }

    #[tokio::test]
    async fn complete_round_trips_against_stub_server() {
        let router = Router::new().route(
            "/chat/completions",
            post(|Json(body): Json<serde_json::Value>| async move {
                let echoed = body["messages"][1]["content"].as_str().unwrap_or("").to_string();
                Json(serde_json::json!({
                    "model": "stub-model",
                    "choices": [{"message": {"role": "assistant", "content": format!("echo: {}", echoed)}, "finish_reason": "stop"}]
                }))
            }),
        );
        let base = spawn_stub(router).await;
        let client = OpenAIClient::new(OpenAIConfig::new("k").with_base_url(base)).unwrap();

        let response = client.complete(request()).await.unwrap();
        assert_eq!(response.content, "echo: hi");
        assert_eq!(response.model, "stub-model");
    }

    #[tokio::test]
    async fn slow_provider_reports_timeout() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "too late"
            }),
        );
        let base = spawn_stub(router).await;
        let client = OpenAIClient::new(
            OpenAIConfig::new("k")
                .with_base_url(base)
                .with_timeout(Duration::from_secs(1)),
        )
        .unwrap();

        let err = client.complete(request()).await.unwrap_err();
        assert!(err.is_timeout(), "expected timeout, got {:?}", err);
    }

    #[tokio::test]
    async fn server_error_is_reported_with_status() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let base = spawn_stub(router).await;
        let client = OpenAIClient::new(OpenAIConfig::new("k").with_base_url(base)).unwrap();

        let err = client.complete(request()).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Status { status: 503, .. }));
    }

    #[test]
    fn provider_info_reports_model() {
        let client = OpenAIClient::new(OpenAIConfig::new("k").with_model("m1")).unwrap();
        let info = client.provider_info();
        assert_eq!(info.model, "m1");
    }
}
