//! Transcript storage adapters that live in process memory.
//!
//! ## Available Adapters
//!
//! - **InMemoryTranscriptStore** - Per-user transcripts in a map (testing/development)
//!
//! The durable store lives in [`crate::adapters::postgres`].

mod in_memory_transcript_store;

pub use in_memory_transcript_store::InMemoryTranscriptStore;
