//! Lifecycle of a single coaching request.
//!
//! ```text
//! Validating -> Classifying -> Composing -> Completing -> Persisting -> Done
//!      \______________\____________\____________\______________\-> Failed
//! ```
//!
//! A session lives for exactly one request; nothing is shared between
//! sessions.

use serde::Serialize;

use crate::domain::foundation::{DomainError, StateMachine};

/// Stage of a coaching session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStage {
    Validating,
    Classifying,
    Composing,
    Completing,
    Persisting,
    Done,
    Failed,
}

impl StateMachine for SessionStage {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStage::*;
        matches!(
            (self, target),
            (Validating, Classifying)
                | (Classifying, Composing)
                | (Composing, Completing)
                | (Completing, Persisting)
                | (Persisting, Done)
                | (Validating | Classifying | Composing | Completing | Persisting, Failed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStage::*;
        match self {
            Validating => vec![Classifying, Failed],
            Classifying => vec![Composing, Failed],
            Composing => vec![Completing, Failed],
            Completing => vec![Persisting, Failed],
            Persisting => vec![Done, Failed],
            Done | Failed => vec![],
        }
    }
}

/// Why a session ended in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The request was missing a user id, message, or profile.
    InvalidRequest,
    /// The completion provider failed or timed out.
    CoachUnavailable,
}

/// Whether both sides of the exchange reached the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistenceStatus {
    /// Nothing written yet.
    Pending,
    /// User and assistant records were both stored.
    Complete,
    /// The reply was delivered but the transcript is incomplete.
    Degraded,
}

/// Tracks one request through its stages.
#[derive(Debug, Clone)]
pub struct CoachingSession {
    stage: SessionStage,
    failure: Option<FailureReason>,
    persistence: PersistenceStatus,
}

impl Default for CoachingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CoachingSession {
    /// Starts a session in `Validating`.
    pub fn new() -> Self {
        Self {
            stage: SessionStage::Validating,
            failure: None,
            persistence: PersistenceStatus::Pending,
        }
    }

    pub fn stage(&self) -> SessionStage {
        self.stage
    }

    pub fn failure(&self) -> Option<FailureReason> {
        self.failure
    }

    pub fn persistence(&self) -> PersistenceStatus {
        self.persistence
    }

    /// Moves to the next stage.
    ///
    /// # Errors
    ///
    /// `InvalidStateTransition` if the edge does not exist.
    pub fn advance(&mut self, next: SessionStage) -> Result<(), DomainError> {
        self.stage = self.stage.transition_to(next)?;
        tracing::trace!(stage = ?self.stage, "coaching session advanced");
        Ok(())
    }

    /// Ends the session as `Failed`.
    ///
    /// # Errors
    ///
    /// `InvalidStateTransition` if the session already finished.
    pub fn fail(&mut self, reason: FailureReason) -> Result<(), DomainError> {
        self.stage = self.stage.transition_to(SessionStage::Failed)?;
        self.failure = Some(reason);
        Ok(())
    }

    /// Records the outcome of the persisting stage.
    pub fn record_persistence(&mut self, status: PersistenceStatus) {
        self.persistence = status;
    }

    pub fn is_degraded(&self) -> bool {
        self.persistence == PersistenceStatus::Degraded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn happy_path_walks_every_stage() {
        let mut session = CoachingSession::new();
        for next in [
            SessionStage::Classifying,
            SessionStage::Composing,
            SessionStage::Completing,
            SessionStage::Persisting,
            SessionStage::Done,
        ] {
            session.advance(next).unwrap();
        }
        assert_eq!(session.stage(), SessionStage::Done);
        assert!(session.stage().is_terminal());
        assert!(session.failure().is_none());
    }

    #[test]
    fn stages_cannot_be_skipped() {
        let mut session = CoachingSession::new();
        let err = session.advance(SessionStage::Completing).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
        assert_eq!(session.stage(), SessionStage::Validating);
    }

    #[test]
    fn failed_is_reachable_from_every_running_stage() {
        for stage in [
            SessionStage::Validating,
            SessionStage::Classifying,
            SessionStage::Composing,
            SessionStage::Completing,
            SessionStage::Persisting,
        ] {
            assert!(stage.can_transition_to(&SessionStage::Failed), "{:?}", stage);
        }
    }

    #[test]
    fn finished_sessions_cannot_fail() {
        let mut session = CoachingSession::new();
        session.fail(FailureReason::InvalidRequest).unwrap();
        assert_eq!(session.failure(), Some(FailureReason::InvalidRequest));
        assert!(session.fail(FailureReason::CoachUnavailable).is_err());
    }

    #[test]
    fn degraded_persistence_is_recorded() {
        let mut session = CoachingSession::new();
        assert_eq!(session.persistence(), PersistenceStatus::Pending);
        session.record_persistence(PersistenceStatus::Degraded);
        assert!(session.is_degraded());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        use SessionStage::*;
        for stage in [Validating, Classifying, Composing, Completing, Persisting, Done, Failed] {
            for target in stage.valid_transitions() {
                assert!(stage.can_transition_to(&target));
            }
        }
    }
}
