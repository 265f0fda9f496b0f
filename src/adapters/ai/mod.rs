//! Completion client adapters.
//!
//! ## Available Adapters
//!
//! - `OpenAIClient` - Any OpenAI-compatible `/chat/completions` endpoint (OpenRouter by default)
//! - `MockCompletionClient` - Configurable mock for testing

mod mock_provider;
mod openai_provider;

pub use mock_provider::{MockCompletionClient, MockReply};
pub use openai_provider::{OpenAIClient, OpenAIConfig};
