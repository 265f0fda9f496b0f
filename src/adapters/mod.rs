//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Completion clients (OpenAI-compatible, mock)
//! - `storage` - In-memory transcript store
//! - `postgres` - PostgreSQL transcript store
//! - `observability` - Exchange observers
//! - `http` - Axum routes

pub mod ai;
pub mod http;
pub mod observability;
pub mod postgres;
pub mod storage;

pub use ai::{MockCompletionClient, OpenAIClient, OpenAIConfig};
pub use observability::TracingExchangeObserver;
pub use postgres::PostgresTranscriptStore;
pub use storage::InMemoryTranscriptStore;
