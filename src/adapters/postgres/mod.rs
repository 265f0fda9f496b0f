//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresTranscriptStore` - Append-only coaching transcript (`chat_messages`)

mod transcript_store;

pub use transcript_store::PostgresTranscriptStore;
