//! Route definitions for coaching endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{coach, get_history, CoachingAppState};

/// Creates the coaching router, relative to the `/api/ai` mount point.
pub fn coaching_router() -> Router<CoachingAppState> {
    Router::new()
        .route("/coach", post(coach))
        .route("/coach/history/:user_id", get(get_history))
}
