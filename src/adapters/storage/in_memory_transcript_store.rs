//! In-Memory Transcript Store Adapter
//!
//! Keeps every user's transcript in process memory. Used by tests and by
//! local runs without a database; contents are lost on restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::coaching::{ChatMessage, ChatRole};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{TranscriptError, TranscriptStore};

#[derive(Debug, Default)]
struct Transcripts {
    by_user: HashMap<UserId, Vec<ChatMessage>>,
    last_stamp: Option<Timestamp>,
}

/// In-memory transcript store.
#[derive(Debug, Clone)]
pub struct InMemoryTranscriptStore {
    inner: Arc<RwLock<Transcripts>>,
    unavailable: Arc<AtomicBool>,
    /// Appends left before the store starts failing; `usize::MAX` disables.
    appends_until_failure: Arc<AtomicUsize>,
}

impl InMemoryTranscriptStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Transcripts::default())),
            unavailable: Arc::new(AtomicBool::new(false)),
            appends_until_failure: Arc::new(AtomicUsize::new(usize::MAX)),
        }
    }

    // === Test Helpers ===

    /// Makes every operation fail with `Unavailable` until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Lets `n` more appends succeed, then fails the rest.
    pub fn fail_appends_after(&self, n: usize) {
        self.appends_until_failure.store(n, Ordering::SeqCst);
    }

    /// Total records across all users.
    pub async fn record_count(&self) -> usize {
        self.inner.read().await.by_user.values().map(Vec::len).sum()
    }

    /// Removes everything.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.by_user.clear();
        inner.last_stamp = None;
    }

    fn check_available(&self) -> Result<(), TranscriptError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TranscriptError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn take_append_budget(&self) -> Result<(), TranscriptError> {
        let consumed = self
            .appends_until_failure
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                0 => None,
                usize::MAX => Some(usize::MAX),
                n => Some(n - 1),
            });
        consumed.map(|_| ()).map_err(|_| {
            TranscriptError::Unavailable("in-memory store rejected append".to_string())
        })
    }
}

impl Default for InMemoryTranscriptStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptStore for InMemoryTranscriptStore {
    async fn append(
        &self,
        user_id: &UserId,
        role: ChatRole,
        content: &str,
    ) -> Result<ChatMessage, TranscriptError> {
        self.check_available()?;
        self.take_append_budget()?;

        let mut inner = self.inner.write().await;

        // Stamps never go backwards, even if the wall clock does.
        let now = Timestamp::now();
        let stamp = match inner.last_stamp {
            Some(last) if last.is_after(&now) => last,
            _ => now,
        };
        inner.last_stamp = Some(stamp);

        let message = ChatMessage::new(user_id.clone(), role, content, stamp);
        inner
            .by_user
            .entry(user_id.clone())
            .or_default()
            .push(message.clone());

        Ok(message)
    }

    async fn list(&self, user_id: &UserId, limit: u32) -> Result<Vec<ChatMessage>, TranscriptError> {
        self.check_available()?;

        let inner = self.inner.read().await;
        Ok(inner
            .by_user
            .get(user_id)
            .map(|messages| messages.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }
}
