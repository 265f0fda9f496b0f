//! HTTP handlers for coaching endpoints.
//!
//! These handlers connect Axum routes to the coaching command and query
//! handlers. Validation messages reach the caller; upstream and storage
//! detail is logged and replaced with a generic message.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::{
    CoachError, CoachReplyHandler, GetHistoryError, GetHistoryHandler, GetHistoryQuery,
};
use crate::ports::{CompletionClient, ExchangeObserver, TranscriptStore};

use super::dto::{CoachRequest, CoachResponse, ErrorResponse, HistoryItem, HistoryParams};

/// Body returned for every server-side failure.
pub const COACH_UNAVAILABLE: &str = "AI Coach unavailable";

// ════════════════════════════════════════════════════════════════════════════════
// Error Type
// ════════════════════════════════════════════════════════════════════════════════

/// Coaching API error that implements IntoResponse.
#[derive(Debug)]
pub enum CoachingApiError {
    BadRequest(String),
    /// Internal detail, logged but never sent.
    Unavailable(String),
}

impl IntoResponse for CoachingApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            CoachingApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg))).into_response()
            }
            CoachingApiError::Unavailable(detail) => {
                tracing::error!(error = %detail, "coaching request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(COACH_UNAVAILABLE)),
                )
                    .into_response()
            }
        }
    }
}

impl From<CoachError> for CoachingApiError {
    fn from(error: CoachError) -> Self {
        match error {
            CoachError::Validation(invalid) => CoachingApiError::BadRequest(invalid.to_string()),
            other => CoachingApiError::Unavailable(other.to_string()),
        }
    }
}

impl From<GetHistoryError> for CoachingApiError {
    fn from(error: GetHistoryError) -> Self {
        match error {
            GetHistoryError::Validation(invalid) => {
                CoachingApiError::BadRequest(invalid.to_string())
            }
            GetHistoryError::Storage(e) => CoachingApiError::Unavailable(e.to_string()),
        }
    }
}

impl From<JsonRejection> for CoachingApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "rejected coaching body");
        CoachingApiError::BadRequest("Invalid JSON body".to_string())
    }
}

impl From<QueryRejection> for CoachingApiError {
    fn from(rejection: QueryRejection) -> Self {
        CoachingApiError::BadRequest(rejection.body_text())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing coaching dependencies.
#[derive(Clone)]
pub struct CoachingAppState {
    pub completion_client: Arc<dyn CompletionClient>,
    pub transcript_store: Arc<dyn TranscriptStore>,
    pub observer: Arc<dyn ExchangeObserver>,
}

impl CoachingAppState {
    pub fn new(
        completion_client: Arc<dyn CompletionClient>,
        transcript_store: Arc<dyn TranscriptStore>,
        observer: Arc<dyn ExchangeObserver>,
    ) -> Self {
        Self {
            completion_client,
            transcript_store,
            observer,
        }
    }

    pub fn coach_reply_handler(&self) -> CoachReplyHandler {
        CoachReplyHandler::new(
            self.completion_client.clone(),
            self.transcript_store.clone(),
            self.observer.clone(),
        )
    }

    pub fn get_history_handler(&self) -> GetHistoryHandler {
        GetHistoryHandler::new(self.transcript_store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/ai/coach - Generate a coaching reply
pub async fn coach(
    State(state): State<CoachingAppState>,
    body: Result<Json<CoachRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CoachingApiError> {
    let Json(request) = body?;

    let reply = state.coach_reply_handler().handle(request.into()).await?;

    Ok((StatusCode::OK, Json(CoachResponse { reply: reply.reply })))
}

/// GET /api/ai/coach/history/:user_id - List a user's transcript, oldest first
pub async fn get_history(
    State(state): State<CoachingAppState>,
    Path(user_id): Path<String>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<impl IntoResponse, CoachingApiError> {
    let Query(params) = params?;

    let query = GetHistoryQuery {
        user_id,
        limit: params.limit,
    };
    let messages = state.get_history_handler().handle(query).await?;

    let items: Vec<HistoryItem> = messages.into_iter().map(HistoryItem::from).collect();
    Ok((StatusCode::OK, Json(items)))
}
