//! Observability adapters.
//!
//! - `TracingExchangeObserver` - Emits exchange outcomes as structured `tracing` events

mod tracing_observer;

pub use tracing_observer::TracingExchangeObserver;
