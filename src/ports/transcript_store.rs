//! Transcript store port.
//!
//! Append-only, per-user log of coaching messages.
//!
//! # Design
//!
//! - **Append-only**: records are never updated or deleted
//! - **Store-stamped**: `created_at` is assigned by the store at write time
//! - **Independent writes**: each append is atomic on its own; there is no
//!   cross-record transaction, so concurrent exchanges for one user may
//!   interleave

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::coaching::{ChatMessage, ChatRole};
use crate::domain::foundation::UserId;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_HISTORY_LIMIT: u32 = 100;

/// Hard cap on records returned by one `list` call.
pub const MAX_HISTORY_LIMIT: u32 = 100;

/// Clamps a requested page size into `1..=MAX_HISTORY_LIMIT`.
pub fn history_limit(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}

/// Repository port for the coaching transcript.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Appends one message, stamping it with the current time.
    ///
    /// # Errors
    ///
    /// - `Unavailable` / `Database` on storage failure
    async fn append(
        &self,
        user_id: &UserId,
        role: ChatRole,
        content: &str,
    ) -> Result<ChatMessage, TranscriptError>;

    /// Lists a user's messages oldest first, at most `limit` records.
    ///
    /// Returns an empty vector for users with no history.
    ///
    /// # Errors
    ///
    /// - `Unavailable` / `Database` on storage failure
    async fn list(&self, user_id: &UserId, limit: u32) -> Result<Vec<ChatMessage>, TranscriptError>;
}

/// Transcript storage errors.
#[derive(Debug, Clone, Error)]
pub enum TranscriptError {
    #[error("transcript store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("corrupt transcript record: {0}")]
    Corrupt(String),
}

/// Outcome of a failed attempt to persist both sides of an exchange.
#[derive(Debug, Clone, Error)]
pub enum PersistenceFailure {
    /// Neither record was stored.
    #[error("exchange not persisted: {source}")]
    Failed { source: TranscriptError },

    /// The user record was stored but the assistant record was not.
    #[error("exchange partially persisted (user message {}): {source}", .user_message.id)]
    Partial {
        user_message: ChatMessage,
        source: TranscriptError,
    },
}

impl PersistenceFailure {
    pub fn is_partial(&self) -> bool {
        matches!(self, PersistenceFailure::Partial { .. })
    }
}
