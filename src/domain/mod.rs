//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machines)
//! - `coaching` - Language classification, prompt composition, transcript records
//!   and the per-request coaching session lifecycle

pub mod coaching;
pub mod foundation;
