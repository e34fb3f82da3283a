//! Conversation persistence and session state for MediBridge.
//!
//! `repository` defines the `ConversationStore` port the infrastructure layer
//! implements; `session` holds the per-user state turns run against.

pub mod repository;
pub mod session;
