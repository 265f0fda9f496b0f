//! Coaching domain - language routing, prompt shaping, transcript records,
//! and the per-request session lifecycle.

mod language;
mod message;
mod profile;
mod prompt;
mod session;

pub use language::{classify, LanguageTag};
pub use message::{ChatMessage, ChatRole};
pub use profile::{ProfileValue, UserProfile, NO_MEDICAL_CONDITIONS};
pub use prompt::{native_instruction, PromptComposer};
pub use session::{CoachingSession, FailureReason, PersistenceStatus, SessionStage};
