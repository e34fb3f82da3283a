//! Shared domain types for MediBridge.
//!
//! Conversations, messages, speaker roles, language codes, configuration and
//! the error types shared across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod conversation;
pub mod error;
pub mod language;
