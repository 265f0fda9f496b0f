//! Request and response bodies for the coaching endpoints.
//!
//! Top-level fields are camelCase to match the web client; profile fields
//! keep their snake_case names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::handlers::CoachReplyCommand;
use crate::domain::coaching::{ChatMessage, ChatRole, UserProfile};

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /coach`. Every field is optional so that omissions reach
/// validation instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl From<CoachRequest> for CoachReplyCommand {
    fn from(req: CoachRequest) -> Self {
        CoachReplyCommand {
            user_id: req.user_id,
            message: req.message,
            profile: req.user_profile,
        }
    }
}

/// Query string of `GET /coach/history/:user_id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u32>,
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachResponse {
    pub reply: String,
}

/// One transcript record as returned by the history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub user_id: String,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<ChatMessage> for HistoryItem {
    fn from(message: ChatMessage) -> Self {
        Self {
            user_id: message.user_id.as_str().to_string(),
            role: message.role,
            content: message.content,
            created_at: *message.created_at.as_datetime(),
        }
    }
}

/// Error body: `{ "error": "..." }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
