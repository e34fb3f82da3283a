//! Application configuration types for MediBridge.
//!
//! `AppConfig` represents `config.toml` in the data directory. Every field
//! has a default, so an empty or missing file yields a working setup that
//! talks to a local whisper server, Google Translate, and (when enabled) a
//! local Ollama instance.

use serde::{Deserialize, Serialize};

use crate::language::LanguageConfig;

/// Top-level configuration loaded from `~/.medibridge/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Initial per-role languages for new sessions.
    #[serde(default)]
    pub languages: LanguageConfig,

    #[serde(default)]
    pub transcription: TranscriptionConfig,

    #[serde(default)]
    pub translation: TranslationConfig,

    #[serde(default)]
    pub summarization: SummarizationConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Speech-to-text engine settings (OpenAI-compatible transcription API).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    #[serde(default = "default_transcription_url")]
    pub base_url: String,
    #[serde(default = "default_transcription_model")]
    pub model: String,
    /// Name of the environment variable holding the API key, if any.
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default = "default_transcription_timeout")]
    pub timeout_secs: u64,
}

fn default_transcription_url() -> String {
    "http://localhost:8000/v1".to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_transcription_timeout() -> u64 {
    120
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            base_url: default_transcription_url(),
            model: default_transcription_model(),
            api_key_env: None,
            timeout_secs: default_transcription_timeout(),
        }
    }
}

/// Translation engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_translation_url")]
    pub base_url: String,
    #[serde(default = "default_translation_timeout")]
    pub timeout_secs: u64,
}

fn default_translation_url() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_translation_timeout() -> u64 {
    30
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: default_translation_url(),
            timeout_secs: default_translation_timeout(),
        }
    }
}

/// Summarization engine settings (Ollama chat API).
///
/// Disabled by default: the summarizer needs a locally hosted model so that
/// conversation transcripts never leave the machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizationConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_summarization_url")]
    pub base_url: String,
    #[serde(default = "default_summarization_model")]
    pub model: String,
    #[serde(default = "default_summarization_timeout")]
    pub timeout_secs: u64,
}

fn default_summarization_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_summarization_model() -> String {
    "mistral:latest".to_string()
}

fn default_summarization_timeout() -> u64 {
    300
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_summarization_url(),
            model: default_summarization_model(),
            timeout_secs: default_summarization_timeout(),
        }
    }
}

/// REST server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Live sessions untouched for this long are dropped from memory.
    /// Their conversations stay in the store and can be resumed.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

fn default_session_idle_secs() -> u64 {
    30 * 60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            session_idle_secs: default_session_idle_secs(),
        }
    }
}
