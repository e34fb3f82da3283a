//! Conversation, turn and summarization logic for MediBridge.
//!
//! This crate defines the ports (store and engine traits) that the
//! infrastructure layer implements. It depends only on `medibridge-types`,
//! never on `medibridge-infra` or any database/HTTP crate.

pub mod conversation;
pub mod engine;
pub mod service;
pub mod summary;
pub mod turn;

#[cfg(test)]
mod testing;
