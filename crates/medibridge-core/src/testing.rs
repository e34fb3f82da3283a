//! In-memory fakes of the store and engines for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use medibridge_types::conversation::{Conversation, Message, NewMessage};
use medibridge_types::error::{EngineError, StoreError};
use medibridge_types::language::LanguagePair;
use uuid::Uuid;

use crate::conversation::repository::ConversationStore;
use crate::engine::{SummaryEngine, Transcriber, Translator};
use crate::service::fingerprint::AudioFingerprinter;

#[derive(Default)]
struct StoreState {
    conversations: Vec<Conversation>,
    messages: HashMap<Uuid, Vec<Message>>,
}

/// `ConversationStore` backed by a mutex-guarded map.
#[derive(Default)]
pub struct InMemoryConversationStore {
    state: Mutex<StoreState>,
    unavailable: AtomicBool,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl ConversationStore for InMemoryConversationStore {
    async fn create_conversation(&self) -> Result<Conversation, StoreError> {
        self.check()?;
        let conversation = Conversation {
            id: Uuid::now_v7(),
            created_at: Utc::now(),
            summary: String::new(),
        };
        self.state.lock().unwrap().conversations.push(conversation.clone());
        Ok(conversation)
    }

    async fn get_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Option<Conversation>, StoreError> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .conversations
            .iter()
            .find(|c| c.id == *conversation_id)
            .cloned())
    }

    async fn append_message(
        &self,
        conversation_id: &Uuid,
        message: &NewMessage,
    ) -> Result<Message, StoreError> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        if !state.conversations.iter().any(|c| c.id == *conversation_id) {
            return Err(StoreError::NotFound);
        }
        let log = state.messages.entry(*conversation_id).or_default();
        let stored = Message {
            id: Uuid::now_v7(),
            conversation_id: *conversation_id,
            seq: log.len() as i64 + 1,
            role: message.role,
            original_text: message.original_text.clone(),
            translated_text: message.translated_text.clone(),
            input_language: message.input_language,
            output_language: message.output_language,
            timestamp: Utc::now(),
        };
        log.push(stored.clone());
        Ok(stored)
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>, StoreError> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(state.conversations.iter().rev().cloned().collect())
    }

    async fn load_messages(&self, conversation_id: &Uuid) -> Result<Vec<Message>, StoreError> {
        self.check()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .messages
            .get(conversation_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Transcriber returning a fixed transcript (or failing) and counting calls.
pub struct FakeTranscriber {
    transcript: Result<String, String>,
    calls: Arc<AtomicUsize>,
}

impl FakeTranscriber {
    pub fn returning(transcript: &str) -> Self {
        Self {
            transcript: Ok(transcript.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            transcript: Err(reason.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Transcriber for FakeTranscriber {
    fn name(&self) -> &str {
        "fake"
    }

    async fn transcribe(&self, _audio: &[u8]) -> Result<String, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.transcript.clone().map_err(EngineError::Request)
    }
}

/// Translator tagging text with its language pair, e.g. `[en->hi] Hello`.
pub struct FakeTranslator {
    fail: bool,
    calls: Arc<AtomicUsize>,
    pairs: Arc<Mutex<Vec<LanguagePair>>>,
}

impl FakeTranslator {
    pub fn new() -> Self {
        Self {
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
            pairs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Every pair this translator was invoked with, in call order.
    pub fn pairs(&self) -> Arc<Mutex<Vec<LanguagePair>>> {
        Arc::clone(&self.pairs)
    }
}

impl Translator for FakeTranslator {
    fn name(&self) -> &str {
        "fake"
    }

    async fn translate(&self, text: &str, pair: LanguagePair) -> Result<String, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pairs.lock().unwrap().push(pair);
        if self.fail {
            return Err(EngineError::Status {
                status: 429,
                body: "too many requests".to_string(),
            });
        }
        Ok(format!("[{}->{}] {text}", pair.source, pair.target))
    }
}

/// Fingerprint that is just the hex encoding of the bytes.
pub struct HexFingerprinter;

impl AudioFingerprinter for HexFingerprinter {
    fn fingerprint(&self, audio: &[u8]) -> String {
        audio.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Summary engine returning a canned response and recording prompts.
pub struct FakeSummaryEngine {
    response: Result<String, String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeSummaryEngine {
    pub fn returning(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            response: Err(reason.to_string()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

impl SummaryEngine for FakeSummaryEngine {
    fn name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, prompt: &str) -> Result<String, EngineError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.response.clone().map_err(EngineError::Request)
    }
}
