//! ExchangeObserver that writes structured log events.
//!
//! Full upstream and storage error detail is logged here; the HTTP layer
//! only ever returns the generic message.

use crate::domain::foundation::UserId;
use crate::ports::{
    ExchangeObserver, ExchangeSummary, FinishReason, PersistenceFailure, UpstreamError,
};

/// Logs exchange outcomes through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingExchangeObserver;

impl TracingExchangeObserver {
    pub fn new() -> Self {
        Self
    }
}

impl ExchangeObserver for TracingExchangeObserver {
    fn exchange_completed(&self, summary: &ExchangeSummary) {
        tracing::info!(
            user_id = %summary.user_id,
            language = %summary.language,
            model = %summary.model,
            prompt_tokens = summary.usage.prompt_tokens,
            completion_tokens = summary.usage.completion_tokens,
            persisted = summary.persisted,
            "coaching exchange completed"
        );
        if summary.finish_reason == FinishReason::Length {
            tracing::warn!(
                user_id = %summary.user_id,
                model = %summary.model,
                completion_tokens = summary.usage.completion_tokens,
                "reply truncated at the max_tokens budget"
            );
        }
    }

    fn upstream_failed(&self, user_id: &UserId, error: &UpstreamError) {
        if error.is_timeout() {
            tracing::warn!(user_id = %user_id, error = %error, "completion provider timed out");
        } else {
            tracing::error!(
                user_id = %user_id,
                error = %error,
                retryable = error.is_retryable(),
                "completion provider failed"
            );
        }
    }

    fn persistence_degraded(&self, user_id: &UserId, failure: &PersistenceFailure) {
        tracing::error!(
            user_id = %user_id,
            partial = failure.is_partial(),
            error = %failure,
            "transcript write incomplete; reply delivered without full history"
        );
    }
}
