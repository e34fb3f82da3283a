//! Conversation, message, and display types for MediBridge.
//!
//! A conversation exclusively owns an append-only log of messages. The store
//! assigns each message's sequence number and timestamp at write time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::language::{Language, Role};

/// A persisted doctor-patient conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Clinical summary. Created empty and never written back.
    pub summary: String,
}

/// One persisted speaker turn.
///
/// Immutable once written. `seq` is assigned by the store and is strictly
/// increasing within a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub seq: i64,
    pub role: Role,
    pub original_text: String,
    pub translated_text: String,
    pub input_language: Language,
    pub output_language: Language,
    pub timestamp: DateTime<Utc>,
}

/// The client-supplied fields of a message, before the store assigns
/// identity, ordering and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    pub role: Role,
    pub original_text: String,
    pub translated_text: String,
    pub input_language: Language,
    pub output_language: Language,
}

/// A rendered chat bubble. Session-scoped, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEntry {
    pub role: Role,
    pub original: String,
    pub translated: String,
}

impl From<&Message> for DisplayEntry {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            original: message.original_text.clone(),
            translated: message.translated_text.clone(),
        }
    }
}

/// Raw input for one turn.
#[derive(Debug, Clone)]
pub enum TurnInput {
    /// Typed text, used as the original text as-is.
    Text(String),
    /// Recorded audio bytes, transcribed before translation.
    Audio(Vec<u8>),
}

impl TurnInput {
    /// Short label used in tracing fields.
    pub fn kind(&self) -> &'static str {
        match self {
            TurnInput::Text(_) => "text",
            TurnInput::Audio(_) => "audio",
        }
    }
}
