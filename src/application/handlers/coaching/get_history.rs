//! GetHistory query handler.
//!
//! Returns a user's transcript oldest first, capped at the history limit.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::coaching::ChatMessage;
use crate::domain::foundation::UserId;
use crate::ports::{history_limit, TranscriptError, TranscriptStore};

use super::coach_reply::InvalidRequest;

/// Query for a user's transcript.
#[derive(Debug, Clone)]
pub struct GetHistoryQuery {
    pub user_id: String,
    /// Requested page size; clamped to `1..=100`, default 100.
    pub limit: Option<u32>,
}

impl GetHistoryQuery {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Errors from history retrieval.
#[derive(Debug, Clone, Error)]
pub enum GetHistoryError {
    #[error("{0}")]
    Validation(#[from] InvalidRequest),

    #[error("history unavailable: {0}")]
    Storage(#[from] TranscriptError),
}

/// Handler for transcript queries.
pub struct GetHistoryHandler {
    transcripts: Arc<dyn TranscriptStore>,
}

impl GetHistoryHandler {
    pub fn new(transcripts: Arc<dyn TranscriptStore>) -> Self {
        Self { transcripts }
    }

    /// Lists the user's messages. Unknown users get an empty list.
    pub async fn handle(&self, query: GetHistoryQuery) -> Result<Vec<ChatMessage>, GetHistoryError> {
        let user_id = UserId::new(query.user_id).map_err(|_| InvalidRequest::MissingUserId)?;
        let limit = history_limit(query.limit);

        let messages = self.transcripts.list(&user_id, limit).await?;
        tracing::debug!(user_id = %user_id, count = messages.len(), "history loaded");
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryTranscriptStore;
    use crate::domain::coaching::ChatRole;

    async fn seeded_store(user: &str, count: usize) -> InMemoryTranscriptStore {
        let store = InMemoryTranscriptStore::new();
        let user_id = UserId::new(user).unwrap();
        for i in 0..count {
            let role = if i % 2 == 0 { ChatRole::User } else { ChatRole::Assistant };
            store.append(&user_id, role, &format!("m{}", i)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn returns_history_in_ascending_order() {
        let store = seeded_store("u1", 6).await;
        let handler = GetHistoryHandler::new(Arc::new(store));

        let history = handler.handle(GetHistoryQuery::new("u1")).await.unwrap();

        assert_eq!(history.len(), 6);
        assert_eq!(history[0].content, "m0");
        assert_eq!(history[5].content, "m5");
        for pair in history.windows(2) {
            assert!(!pair[1].created_at.is_before(&pair[0].created_at));
        }
    }

    #[tokio::test]
    async fn unknown_user_gets_empty_list() {
        let handler = GetHistoryHandler::new(Arc::new(InMemoryTranscriptStore::new()));
        let history = handler.handle(GetHistoryQuery::new("nobody")).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn caps_at_one_hundred_records() {
        let store = seeded_store("u1", 105).await;
        let handler = GetHistoryHandler::new(Arc::new(store));

        let history = handler
            .handle(GetHistoryQuery::new("u1").with_limit(500))
            .await
            .unwrap();

        assert_eq!(history.len(), 100);
        assert_eq!(history[0].content, "m0");
    }

    #[tokio::test]
    async fn honours_smaller_limits() {
        let store = seeded_store("u1", 6).await;
        let handler = GetHistoryHandler::new(Arc::new(store));

        let history = handler
            .handle(GetHistoryQuery::new("u1").with_limit(2))
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn blank_user_id_is_rejected() {
        let handler = GetHistoryHandler::new(Arc::new(InMemoryTranscriptStore::new()));
        let err = handler.handle(GetHistoryQuery::new("  ")).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing userId");
    }

    #[tokio::test]
    async fn storage_outage_is_an_error() {
        let store = InMemoryTranscriptStore::new();
        store.set_unavailable(true);
        let handler = GetHistoryHandler::new(Arc::new(store));

        let err = handler.handle(GetHistoryQuery::new("u1")).await.unwrap_err();
        assert!(matches!(err, GetHistoryError::Storage(_)));
    }
}
