//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod coaching;

pub use coaching::{
    CoachError, CoachReply, CoachReplyCommand, CoachReplyHandler, GetHistoryError,
    GetHistoryHandler, GetHistoryQuery, InvalidRequest,
};
