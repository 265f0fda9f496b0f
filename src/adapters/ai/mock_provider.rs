//! Mock completion client for testing.
//!
//! Lets tests drive the coaching pipeline without calling a real provider.
//!
//! # Features
//!
//! - Pre-configured replies, consumed in order
//! - Simulated latency with an optional deadline, for timeout testing
//! - Error injection
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let client = MockCompletionClient::new()
//!     .with_reply("💪 Today's Focus")
//!     .with_delay(Duration::from_millis(100));
//!
//! let response = client.complete(request).await?;
//! assert_eq!(response.content, "💪 Today's Focus");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    CompletionClient, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage, UpstreamError,
};

/// A configured mock outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return a successful completion.
    Success { content: String, usage: TokenUsage },
    /// Return an error.
    Error(UpstreamError),
}

/// Mock completion client.
#[derive(Debug, Clone)]
pub struct MockCompletionClient {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    info: ProviderInfo,
    delay: Duration,
    timeout: Option<Duration>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            timeout: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful reply.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        self.push(MockReply::Success {
            content: content.into(),
            usage: TokenUsage::new(10, 20),
        })
    }

    /// Queues an error.
    pub fn with_error(self, error: UpstreamError) -> Self {
        self.push(MockReply::Error(error))
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Enforces a deadline like a real adapter: if the delay exceeds it, the
    /// call fails with `Timeout` once the deadline passes.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.info = info;
        self
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All recorded requests, oldest first.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn push(self, reply: MockReply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockReply::Success {
                content: "Mock reply".to_string(),
                usage: TokenUsage::new(5, 10),
            })
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, UpstreamError> {
        self.calls.lock().unwrap().push(request);

        match self.timeout {
            Some(timeout) if self.delay > timeout => {
                sleep(timeout).await;
                return Err(UpstreamError::Timeout {
                    timeout_secs: timeout.as_secs(),
                });
            }
            _ => {
                if !self.delay.is_zero() {
                    sleep(self.delay).await;
                }
            }
        }

        match self.next_reply() {
            MockReply::Success { content, usage } => Ok(CompletionResponse {
                content,
                usage,
                model: self.info.model.clone(),
                finish_reason: FinishReason::Stop,
            }),
            MockReply::Error(error) => Err(error),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}
