//! Completion Client Port - Interface for the chat-completion provider.
//!
//! Abstracts the remote LLM so the coaching pipeline can generate replies
//! without coupling to a specific vendor.
//!
//! # Design
//!
//! - One system prompt plus one user message per call
//! - Model, temperature and output budget are fixed per deployment and live
//!   in the adapter's configuration, not in the request
//! - Every adapter applies a finite timeout and reports it as
//!   [`UpstreamError::Timeout`]
//! - No retries happen behind this port; callers decide using
//!   [`UpstreamError::is_retryable`]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;

/// Port for chat-completion providers.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate a single completion.
    async fn complete(&self, request: CompletionRequest)
        -> Result<CompletionResponse, UpstreamError>;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Request for a completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Instruction that shapes the reply.
    pub system_prompt: String,
    /// The user's message, passed through unchanged.
    pub user_message: String,
    /// Request metadata for tracing.
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    pub fn new(
        system_prompt: impl Into<String>,
        user_message: impl Into<String>,
        metadata: RequestMetadata,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_message: user_message.into(),
            metadata,
        }
    }
}

/// Request metadata for tracing.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// User the reply is generated for.
    pub user_id: UserId,
    /// Trace ID for correlating logs.
    pub trace_id: String,
}

impl RequestMetadata {
    pub fn new(user_id: UserId, trace_id: impl Into<String>) -> Self {
        Self {
            user_id,
            trace_id: trace_id.into(),
        }
    }
}

/// Response from a completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated content (never empty).
    pub content: String,
    /// Token usage as reported by the provider.
    pub usage: TokenUsage,
    /// Model that generated the response.
    pub model: String,
    /// Why the model stopped generating.
    pub finish_reason: FinishReason,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop (end of response).
    Stop,
    /// Hit the max_tokens budget.
    Length,
    /// Content was filtered for safety.
    ContentFilter,
}

impl FinishReason {
    /// Maps the provider's finish reason string; unknown values count as `Stop`.
    pub fn from_provider(reason: Option<&str>) -> Self {
        match reason {
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            _ => FinishReason::Stop,
        }
    }
}

/// Provider information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "openrouter").
    pub name: String,
    /// Model identifier (e.g., "openai/gpt-4o-mini").
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Completion provider errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    /// The call exceeded its time budget.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// Connection or transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// Rate limited by provider.
    #[error("rate limited by provider")]
    RateLimited,

    /// API key rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Any other non-2xx response.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for logs only.
        body: String,
    },

    /// Response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Response decoded but carried no generated text.
    #[error("provider returned an empty completion")]
    EmptyResponse,
}

impl UpstreamError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// True for the timeout sub-kind.
    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Timeout { .. })
    }

    /// Returns true if a caller-level retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            UpstreamError::Timeout { .. }
            | UpstreamError::Network(_)
            | UpstreamError::RateLimited => true,
            UpstreamError::Status { status, .. } => *status >= 500,
            UpstreamError::AuthenticationFailed
            | UpstreamError::Parse(_)
            | UpstreamError::EmptyResponse => false,
        }
    }
}
