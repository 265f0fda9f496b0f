//! HTTP adapter for coaching endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CoachRequest, CoachResponse, ErrorResponse, HistoryItem, HistoryParams};
pub use handlers::{CoachingApiError, CoachingAppState, COACH_UNAVAILABLE};
pub use routes::coaching_router;
