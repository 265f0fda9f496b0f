//! HTTP adapters - REST API implementations.
//!
//! `api_router` assembles the public surface: the coaching endpoints under
//! `/api/ai`, wrapped in tracing, CORS and a whole-request timeout.

pub mod coaching;

pub use coaching::{coaching_router, CoachingApiError, CoachingAppState};

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Mount point of the coaching API.
pub const API_PREFIX: &str = "/api/ai";

/// Builds the full application router.
pub fn api_router(state: CoachingAppState, server: &ServerConfig) -> Router {
    Router::new()
        .nest(API_PREFIX, coaching_router().with_state(state))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(TraceLayer::new_for_http())
}

/// Any origin when none are configured; otherwise exactly the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new().allow_headers(Any).allow_methods(Any);
    if allowed.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(allowed)
    }
}
