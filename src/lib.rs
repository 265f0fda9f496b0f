//! Fitness Coach - Conversation-aware coaching backend
//!
//! Classifies the language of each user message, composes a profile-aware
//! system prompt pinned to that language, asks a chat-completion provider
//! for a reply, and keeps an append-only transcript per user.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
