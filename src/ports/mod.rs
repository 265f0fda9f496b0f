//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `CompletionClient` - Remote chat-completion provider
//! - `TranscriptStore` - Append-only per-user message log
//! - `ExchangeObserver` - Observability hook for exchange outcomes

mod completion_client;
mod exchange_observer;
mod transcript_store;

pub use completion_client::{
    CompletionClient, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    RequestMetadata, TokenUsage, UpstreamError,
};
pub use exchange_observer::{ExchangeObserver, ExchangeSummary, NoOpExchangeObserver};
pub use transcript_store::{
    history_limit, PersistenceFailure, TranscriptError, TranscriptStore, DEFAULT_HISTORY_LIMIT,
    MAX_HISTORY_LIMIT,
};
