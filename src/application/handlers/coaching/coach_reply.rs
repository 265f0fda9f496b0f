//! CoachReply command handler.
//!
//! Runs one coaching exchange: validate, classify, compose, complete,
//! persist. Completion failures end the request; persistence failures do
//! not, the reply is still returned and the gap is reported to the
//! observer.

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::coaching::{
    classify, ChatRole, CoachingSession, FailureReason, LanguageTag, PersistenceStatus,
    PromptComposer, SessionStage, UserProfile,
};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{
    CompletionClient, CompletionRequest, ExchangeObserver, ExchangeSummary, PersistenceFailure,
    RequestMetadata, TokenUsage, TranscriptStore, UpstreamError,
};

/// Command carrying one coaching request as received.
///
/// Fields are optional so that the handler, not the transport, decides
/// which omissions are errors.
#[derive(Debug, Clone, Default)]
pub struct CoachReplyCommand {
    pub user_id: Option<String>,
    pub message: Option<String>,
    pub profile: Option<UserProfile>,
}

impl CoachReplyCommand {
    pub fn new(
        user_id: impl Into<String>,
        message: impl Into<String>,
        profile: UserProfile,
    ) -> Self {
        Self {
            user_id: Some(user_id.into()),
            message: Some(message.into()),
            profile: Some(profile),
        }
    }
}

/// A rejected request, with the message shown to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidRequest {
    #[error("Missing userId")]
    MissingUserId,

    #[error("Missing message or userProfile")]
    MissingMessageOrProfile,
}

/// Errors that end a coaching request without a reply.
#[derive(Debug, Clone, Error)]
pub enum CoachError {
    #[error("{0}")]
    Validation(#[from] InvalidRequest),

    /// The completion provider failed; detail is for logs only.
    #[error("coach unavailable: {0}")]
    Unavailable(#[from] UpstreamError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for CoachError {
    fn from(err: DomainError) -> Self {
        CoachError::Internal(err.to_string())
    }
}

/// Result of a successful exchange.
#[derive(Debug, Clone)]
pub struct CoachReply {
    /// Generated reply, returned to the caller verbatim.
    pub reply: String,
    pub language: LanguageTag,
    pub model: String,
    pub usage: TokenUsage,
    /// `Degraded` when the transcript is missing one or both records.
    pub persistence: PersistenceStatus,
}

struct ValidRequest {
    user_id: UserId,
    message: String,
    profile: UserProfile,
}

/// Handler for coaching exchanges.
pub struct CoachReplyHandler {
    completion: Arc<dyn CompletionClient>,
    transcripts: Arc<dyn TranscriptStore>,
    observer: Arc<dyn ExchangeObserver>,
    composer: PromptComposer,
}

impl CoachReplyHandler {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        transcripts: Arc<dyn TranscriptStore>,
        observer: Arc<dyn ExchangeObserver>,
    ) -> Self {
        Self {
            completion,
            transcripts,
            observer,
            composer: PromptComposer::new(),
        }
    }

    /// Handles one coaching request.
    ///
    /// # Errors
    ///
    /// - `Validation` when the user id, message, or profile is missing
    /// - `Unavailable` when the completion provider fails or times out
    pub async fn handle(&self, cmd: CoachReplyCommand) -> Result<CoachReply, CoachError> {
        let mut session = CoachingSession::new();

        let request = match validate(cmd) {
            Ok(request) => request,
            Err(invalid) => {
                session.fail(FailureReason::InvalidRequest)?;
                tracing::debug!(reason = %invalid, "coaching request rejected");
                return Err(invalid.into());
            }
        };

        session.advance(SessionStage::Classifying)?;
        let language = classify(request.message.as_str());

        session.advance(SessionStage::Composing)?;
        let system_prompt = self.composer.compose(&request.profile, language);

        session.advance(SessionStage::Completing)?;
        let completion = CompletionRequest::new(
            system_prompt,
            request.message.clone(),
            RequestMetadata::new(request.user_id.clone(), Uuid::new_v4().to_string()),
        );
        let response = match self.completion.complete(completion).await {
            Ok(response) => response,
            Err(error) => {
                self.observer.upstream_failed(&request.user_id, &error);
                session.fail(FailureReason::CoachUnavailable)?;
                return Err(error.into());
            }
        };

        session.advance(SessionStage::Persisting)?;
        match self
            .persist_exchange(&request.user_id, &request.message, &response.content)
            .await
        {
            Ok(()) => session.record_persistence(PersistenceStatus::Complete),
            Err(failure) => {
                self.observer.persistence_degraded(&request.user_id, &failure);
                session.record_persistence(PersistenceStatus::Degraded);
            }
        }
        session.advance(SessionStage::Done)?;

        self.observer.exchange_completed(&ExchangeSummary {
            user_id: request.user_id,
            language,
            model: response.model.clone(),
            usage: response.usage,
            finish_reason: response.finish_reason,
            persisted: !session.is_degraded(),
        });

        Ok(CoachReply {
            reply: response.content,
            language,
            model: response.model,
            usage: response.usage,
            persistence: session.persistence(),
        })
    }

    /// Writes the user record, then the assistant record.
    async fn persist_exchange(
        &self,
        user_id: &UserId,
        message: &str,
        reply: &str,
    ) -> Result<(), PersistenceFailure> {
        let user_message = self
            .transcripts
            .append(user_id, ChatRole::User, message)
            .await
            .map_err(|source| PersistenceFailure::Failed { source })?;

        self.transcripts
            .append(user_id, ChatRole::Assistant, reply)
            .await
            .map_err(|source| PersistenceFailure::Partial {
                user_message,
                source,
            })?;

        Ok(())
    }
}

/// User id is checked first so its message wins when several fields are missing.
fn validate(cmd: CoachReplyCommand) -> Result<ValidRequest, InvalidRequest> {
    let user_id = cmd
        .user_id
        .and_then(|id| UserId::new(id).ok())
        .ok_or(InvalidRequest::MissingUserId)?;

    let message = cmd
        .message
        .filter(|m| !m.is_empty())
        .ok_or(InvalidRequest::MissingMessageOrProfile)?;
    let profile = cmd.profile.ok_or(InvalidRequest::MissingMessageOrProfile)?;

    Ok(ValidRequest {
        user_id,
        message,
        profile,
    })
}
