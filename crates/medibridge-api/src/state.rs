//! Application state wiring the store, engines and services together.
//!
//! The turn processor and summarizer are generic over store/engine traits;
//! AppState pins them to the concrete infra implementations. Live sessions
//! are kept in a `SessionRegistry` so that each browser (or CLI run) works
//! against its own isolated `ConversationSession`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use medibridge_core::conversation::session::ConversationSession;
use medibridge_core::summary::ClinicalSummarizer;
use medibridge_core::turn::{TurnProcessor, TurnTimeouts};
use medibridge_infra::config::{load_config, resolve_api_key, resolve_data_dir};
use medibridge_infra::crypto::hash::Sha256Fingerprinter;
use medibridge_infra::engine::{GoogleTranslator, OllamaSummaryEngine, WhisperTranscriber};
use medibridge_infra::sqlite::conversation::SqliteConversationStore;
use medibridge_infra::sqlite::pool::{database_url, DatabasePool};
use medibridge_types::config::AppConfig;
use medibridge_types::error::StoreError;
use medibridge_types::language::LanguageConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteTurnProcessor = TurnProcessor<
    SqliteConversationStore,
    WhisperTranscriber,
    GoogleTranslator,
    Sha256Fingerprinter,
>;

pub type ConcreteSummarizer = ClinicalSummarizer<SqliteConversationStore, OllamaSummaryEngine>;

/// A live session shared between requests; turns on one session are serialized
/// by its mutex.
pub type SharedSession = Arc<Mutex<ConversationSession>>;

struct RegisteredSession {
    session: SharedSession,
    last_used: Instant,
}

/// Live sessions keyed by session id.
///
/// Session ids are distinct from conversation ids: two browsers may resume
/// the same conversation and still keep separate display logs. Sessions
/// nobody has looked up for a while are dropped by [`SessionRegistry::evict_idle`];
/// their conversations remain in the store.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<Uuid, RegisteredSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session and return its new id.
    pub fn insert(&self, session: ConversationSession) -> Uuid {
        let id = Uuid::now_v7();
        self.sessions.insert(
            id,
            RegisteredSession {
                session: Arc::new(Mutex::new(session)),
                last_used: Instant::now(),
            },
        );
        id
    }

    /// Look up a session and mark it as used.
    pub fn get(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.get_mut(id).map(|mut entry| {
            entry.last_used = Instant::now();
            Arc::clone(&entry.session)
        })
    }

    /// Forget a session. The conversation stays in the store.
    pub fn remove(&self, id: &Uuid) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Drop sessions unused for at least `max_idle`. A session still held by
    /// an in-flight request is kept. Returns how many were dropped.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut evicted = 0;
        self.sessions.retain(|_, entry| {
            let keep =
                Arc::strong_count(&entry.session) > 1 || entry.last_used.elapsed() < max_idle;
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }

    /// Periodically evict idle sessions until the returned task is aborted.
    pub fn spawn_sweeper(&self, max_idle: Duration) -> tokio::task::JoinHandle<()> {
        let registry = self.clone();
        let period = (max_idle / 4).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = registry.evict_idle(max_idle);
                if evicted > 0 {
                    tracing::info!(evicted, remaining = registry.len(), "Idle sessions evicted");
                }
            }
        })
    }
}

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: SqliteConversationStore,
    pub turn_processor: Arc<ConcreteTurnProcessor>,
    /// Present only when `[summarization] enabled = true`.
    pub summarizer: Option<Arc<ConcreteSummarizer>>,
    pub sessions: SessionRegistry,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire
    /// engines and services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;
        Self::build(data_dir, config).await
    }

    /// Wire the state for an existing data directory and a loaded config.
    pub async fn build(data_dir: PathBuf, config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&format!("{}?mode=rwc", database_url(&data_dir))).await?;
        let store = SqliteConversationStore::new(db_pool);

        let api_key = resolve_api_key(config.transcription.api_key_env.as_deref());
        let transcriber = WhisperTranscriber::new(&config.transcription, api_key)?;
        let translator = GoogleTranslator::new(&config.translation)?;
        let timeouts = TurnTimeouts {
            transcription: Duration::from_secs(config.transcription.timeout_secs),
            translation: Duration::from_secs(config.translation.timeout_secs),
        };
        let turn_processor =
            TurnProcessor::new(store.clone(), transcriber, translator, Sha256Fingerprinter::new())
                .with_timeouts(timeouts);

        let summarizer = if config.summarization.enabled {
            let engine = OllamaSummaryEngine::new(&config.summarization)?;
            tracing::info!(model = engine.model(), "Summarization enabled");
            Some(Arc::new(ClinicalSummarizer::new(
                store.clone(),
                engine,
                Duration::from_secs(config.summarization.timeout_secs),
            )))
        } else {
            None
        };

        Ok(Self {
            store,
            turn_processor: Arc::new(turn_processor),
            summarizer,
            sessions: SessionRegistry::new(),
            config: Arc::new(config),
            data_dir,
        })
    }

    /// Start a session on a new conversation or resume an existing one.
    ///
    /// Languages default to `[languages]` from the config.
    pub async fn open_session(
        &self,
        resume: Option<Uuid>,
        languages: Option<LanguageConfig>,
    ) -> Result<ConversationSession, StoreError> {
        let languages = languages.unwrap_or(self.config.languages);
        ConversationSession::start_or_resume(&self.store, resume, languages).await
    }
}
