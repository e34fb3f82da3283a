//! Per-user conversation session state.
//!
//! A `ConversationSession` is the explicit context every turn runs against:
//! the active conversation, the per-role language selection, the display
//! log, and the fingerprint of the last processed recording. Nothing here is
//! persisted; the server keeps one session per browser behind its own mutex.

use medibridge_types::conversation::DisplayEntry;
use medibridge_types::error::StoreError;
use medibridge_types::language::LanguageConfig;
use tracing::info;
use uuid::Uuid;

use crate::conversation::repository::ConversationStore;

/// In-memory state of one user's interaction with a conversation.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    conversation_id: Uuid,
    languages: LanguageConfig,
    display_log: Vec<DisplayEntry>,
    /// Fingerprint of the most recently processed recording (window of one).
    last_audio_fingerprint: Option<String>,
}

impl ConversationSession {
    /// Start a session on a new conversation, or resume an existing one.
    ///
    /// Resuming rebuilds the display log from the persisted messages and
    /// fails with `StoreError::NotFound` for an unknown id. A store failure
    /// is fatal: there is no offline fallback conversation.
    pub async fn start_or_resume<S: ConversationStore>(
        store: &S,
        resume: Option<Uuid>,
        languages: LanguageConfig,
    ) -> Result<Self, StoreError> {
        match resume {
            Some(conversation_id) => {
                if store.get_conversation(&conversation_id).await?.is_none() {
                    return Err(StoreError::NotFound);
                }
                let messages = store.load_messages(&conversation_id).await?;
                info!(
                    conversation_id = %conversation_id,
                    message_count = messages.len(),
                    "Conversation resumed"
                );
                Ok(Self {
                    conversation_id,
                    languages,
                    display_log: messages.iter().map(DisplayEntry::from).collect(),
                    last_audio_fingerprint: None,
                })
            }
            None => {
                let conversation = store.create_conversation().await?;
                info!(conversation_id = %conversation.id, "Conversation started");
                Ok(Self::new(conversation.id, languages))
            }
        }
    }

    /// Wrap an existing conversation id with an empty display log.
    pub fn new(conversation_id: Uuid, languages: LanguageConfig) -> Self {
        Self {
            conversation_id,
            languages,
            display_log: Vec::new(),
            last_audio_fingerprint: None,
        }
    }

    /// The conversation new turns are appended to.
    pub fn conversation_id(&self) -> Uuid {
        self.conversation_id
    }

    /// Current per-role language selection.
    pub fn languages(&self) -> LanguageConfig {
        self.languages
    }

    /// Change the language selection for subsequent turns.
    pub fn set_languages(&mut self, languages: LanguageConfig) {
        self.languages = languages;
    }

    /// Messages shown to the user, oldest first.
    pub fn display_log(&self) -> &[DisplayEntry] {
        &self.display_log
    }

    /// Empty the display log.
    ///
    /// The persisted conversation and its messages are untouched, and new
    /// turns keep going to the same conversation.
    pub fn clear(&mut self) {
        self.display_log.clear();
    }

    /// Whether `fingerprint` matches the last processed recording.
    pub fn is_duplicate_audio(&self, fingerprint: &str) -> bool {
        self.last_audio_fingerprint.as_deref() == Some(fingerprint)
    }

    pub(crate) fn record_audio(&mut self, fingerprint: String) {
        self.last_audio_fingerprint = Some(fingerprint);
    }

    pub(crate) fn push_display(&mut self, entry: DisplayEntry) {
        self.display_log.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryConversationStore;
    use medibridge_types::conversation::NewMessage;
    use medibridge_types::language::{Language, Role};

    fn doctor_hello() -> NewMessage {
        NewMessage {
            role: Role::Doctor,
            original_text: "Hello".to_string(),
            translated_text: "Namaste".to_string(),
            input_language: Language::English,
            output_language: Language::Hindi,
        }
    }

    #[tokio::test]
    async fn test_start_creates_conversation() {
        let store = InMemoryConversationStore::new();
        let session = ConversationSession::start_or_resume(&store, None, LanguageConfig::default())
            .await
            .unwrap();

        assert!(session.display_log().is_empty());
        let conversations = store.list_conversations().await.unwrap();
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].id, session.conversation_id());
        assert!(conversations[0].summary.is_empty());
    }

    #[tokio::test]
    async fn test_start_fails_when_store_unavailable() {
        let store = InMemoryConversationStore::new();
        store.set_unavailable(true);

        let result =
            ConversationSession::start_or_resume(&store, None, LanguageConfig::default()).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_resume_rebuilds_display_log() {
        let store = InMemoryConversationStore::new();
        let conversation = store.create_conversation().await.unwrap();
        store.append_message(&conversation.id, &doctor_hello()).await.unwrap();

        let session = ConversationSession::start_or_resume(
            &store,
            Some(conversation.id),
            LanguageConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(session.conversation_id(), conversation.id);
        assert_eq!(session.display_log().len(), 1);
        assert_eq!(session.display_log()[0].original, "Hello");
        assert_eq!(session.display_log()[0].translated, "Namaste");
        // Resuming must not create another conversation.
        assert_eq!(store.list_conversations().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_resume_unknown_conversation_is_not_found() {
        let store = InMemoryConversationStore::new();
        let result = ConversationSession::start_or_resume(
            &store,
            Some(Uuid::now_v7()),
            LanguageConfig::default(),
        )
        .await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_clear_keeps_conversation_and_messages() {
        let store = InMemoryConversationStore::new();
        let conversation = store.create_conversation().await.unwrap();
        store.append_message(&conversation.id, &doctor_hello()).await.unwrap();

        let mut session = ConversationSession::start_or_resume(
            &store,
            Some(conversation.id),
            LanguageConfig::default(),
        )
        .await
        .unwrap();
        session.clear();

        assert!(session.display_log().is_empty());
        assert_eq!(session.conversation_id(), conversation.id);
        assert_eq!(store.load_messages(&conversation.id).await.unwrap().len(), 1);
        assert_eq!(store.list_conversations().await.unwrap().len(), 1);
    }

    #[test]
    fn test_audio_fingerprint_window_of_one() {
        let mut session = ConversationSession::new(Uuid::now_v7(), LanguageConfig::default());
        assert!(!session.is_duplicate_audio("a"));

        session.record_audio("a".to_string());
        assert!(session.is_duplicate_audio("a"));

        session.record_audio("b".to_string());
        assert!(session.is_duplicate_audio("b"));
        assert!(!session.is_duplicate_audio("a"));
    }

    #[test]
    fn test_set_languages() {
        let mut session = ConversationSession::new(Uuid::now_v7(), LanguageConfig::default());
        session.set_languages(LanguageConfig {
            doctor: Language::German,
            patient: Language::Spanish,
        });
        assert_eq!(session.languages().doctor, Language::German);
        assert_eq!(session.languages().patient, Language::Spanish);
    }
}
