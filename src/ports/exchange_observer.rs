//! Observability hook for coaching exchanges.
//!
//! The coaching handler reports outcomes here instead of deciding how they
//! are surfaced. Failures passed to the observer carry full upstream and
//! storage detail; callers of the HTTP API never see it.

use crate::domain::coaching::LanguageTag;
use crate::domain::foundation::UserId;

use super::{FinishReason, PersistenceFailure, TokenUsage, UpstreamError};

/// Summary of an exchange that produced a reply.
#[derive(Debug, Clone)]
pub struct ExchangeSummary {
    pub user_id: UserId,
    pub language: LanguageTag,
    pub model: String,
    pub usage: TokenUsage,
    pub finish_reason: FinishReason,
    /// False when the transcript write was incomplete.
    pub persisted: bool,
}

/// Receives coaching outcomes.
pub trait ExchangeObserver: Send + Sync {
    /// A reply was produced and returned to the caller.
    fn exchange_completed(&self, summary: &ExchangeSummary);

    /// The completion provider failed; the caller gets a generic error.
    fn upstream_failed(&self, user_id: &UserId, error: &UpstreamError);

    /// The reply was delivered but the transcript is missing records.
    fn persistence_degraded(&self, user_id: &UserId, failure: &PersistenceFailure);
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpExchangeObserver;

impl ExchangeObserver for NoOpExchangeObserver {
    fn exchange_completed(&self, _summary: &ExchangeSummary) {}
    fn upstream_failed(&self, _user_id: &UserId, _error: &UpstreamError) {}
    fn persistence_degraded(&self, _user_id: &UserId, _failure: &PersistenceFailure) {}
}
