//! Transcript records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{MessageId, Timestamp, UserId, ValidationError};

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(ChatRole::User),
            "assistant" => Ok(ChatRole::Assistant),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown chat role '{}'", other),
            )),
        }
    }
}

/// One immutable entry in a user's transcript.
///
/// `created_at` is assigned by the transcript store at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub user_id: UserId,
    pub role: ChatRole,
    pub content: String,
    pub created_at: Timestamp,
}

impl ChatMessage {
    /// Creates a record stamped with the given creation time.
    pub fn new(
        user_id: UserId,
        role: ChatRole,
        content: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: MessageId::new(),
            user_id,
            role,
            content: content.into(),
            created_at,
        }
    }

    /// Rebuilds a record loaded from storage.
    pub fn reconstitute(
        id: MessageId,
        user_id: UserId,
        role: ChatRole,
        content: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            role,
            content,
            created_at,
        }
    }
}
