//! Coaching command and query handlers.

mod coach_reply;
mod get_history;

pub use coach_reply::{
    CoachError, CoachReply, CoachReplyCommand, CoachReplyHandler, InvalidRequest,
};
pub use get_history::{GetHistoryError, GetHistoryHandler, GetHistoryQuery};
