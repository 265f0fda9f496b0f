//! PostgreSQL implementation of TranscriptStore.
//!
//! Each append is a single-row INSERT; `created_at` comes from the database
//! clock so stamps are consistent across service instances. `seq` breaks
//! ties between records written within the same microsecond.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::coaching::{ChatMessage, ChatRole};
use crate::domain::foundation::{MessageId, Timestamp, UserId};
use crate::ports::{TranscriptError, TranscriptStore};

/// PostgreSQL implementation of TranscriptStore.
#[derive(Clone)]
pub struct PostgresTranscriptStore {
    pool: PgPool,
}

impl PostgresTranscriptStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TranscriptStore for PostgresTranscriptStore {
    async fn append(
        &self,
        user_id: &UserId,
        role: ChatRole,
        content: &str,
    ) -> Result<ChatMessage, TranscriptError> {
        let id = MessageId::new();

        let row = sqlx::query(
            r#"
            INSERT INTO chat_messages (id, user_id, role, content, created_at)
            VALUES ($1, $2, $3, $4, clock_timestamp())
            RETURNING id, user_id, role, content, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(user_id.as_str())
        .bind(role.as_str())
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TranscriptError::Database(format!("Failed to insert chat message: {}", e)))?;

        row_to_message(&row)
    }

    async fn list(&self, user_id: &UserId, limit: u32) -> Result<Vec<ChatMessage>, TranscriptError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, role, content, created_at
            FROM chat_messages
            WHERE user_id = $1
            ORDER BY created_at ASC, seq ASC
            LIMIT $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TranscriptError::Database(format!("Failed to fetch chat messages: {}", e)))?;

        rows.iter().map(row_to_message).collect()
    }
}

fn row_to_message(row: &PgRow) -> Result<ChatMessage, TranscriptError> {
    let corrupt = |e: sqlx::Error| TranscriptError::Corrupt(e.to_string());

    let id: uuid::Uuid = row.try_get("id").map_err(corrupt)?;
    let user_id: String = row.try_get("user_id").map_err(corrupt)?;
    let role_str: String = row.try_get("role").map_err(corrupt)?;
    let content: String = row.try_get("content").map_err(corrupt)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(corrupt)?;

    let role: ChatRole = role_str
        .parse()
        .map_err(|e| TranscriptError::Corrupt(format!("message {}: {}", id, e)))?;
    let user_id =
        UserId::new(user_id).map_err(|e| TranscriptError::Corrupt(format!("message {}: {}", id, e)))?;

    Ok(ChatMessage::reconstitute(
        MessageId::from_uuid(id),
        user_id,
        role,
        content,
        Timestamp::from_datetime(created_at),
    ))
}
