//! Turn processor: one speaker turn in, one persisted message out.
//!
//! `TurnProcessor` resolves the language pair from the speaker's role,
//! transcribes audio, translates, persists the message, and only then
//! updates the session's display log. A failure at any step abandons the
//! turn with nothing persisted or displayed.

use std::time::Duration;

use medibridge_types::conversation::{DisplayEntry, Message, NewMessage, TurnInput};
use medibridge_types::error::{EngineError, TurnError};
use medibridge_types::language::{LanguageConfig, LanguagePair, Role};
use tracing::{debug, info, warn};

use crate::conversation::repository::ConversationStore;
use crate::conversation::session::ConversationSession;
use crate::engine::{with_timeout, Transcriber, Translator};
use crate::service::fingerprint::AudioFingerprinter;

/// Resolve the (source, target) pair for a turn.
///
/// The speaker's language is always the source and the other role's
/// language the target.
pub fn resolve_languages(role: Role, config: &LanguageConfig) -> LanguagePair {
    match role {
        Role::Doctor => LanguagePair {
            source: config.doctor,
            target: config.patient,
        },
        Role::Patient => LanguagePair {
            source: config.patient,
            target: config.doctor,
        },
    }
}

/// Upper bounds for the engine calls made during a turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnTimeouts {
    pub transcription: Duration,
    pub translation: Duration,
}

impl Default for TurnTimeouts {
    fn default() -> Self {
        Self {
            transcription: Duration::from_secs(120),
            translation: Duration::from_secs(30),
        }
    }
}

/// Result of submitting a turn.
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// The turn was persisted and appended to the display log.
    Completed(Message),
    /// The recording matches the last one processed in this session and was
    /// skipped without calling any engine.
    DuplicateAudio,
}

/// Processes turns against a session.
///
/// Generic over the store, engines and fingerprinter so that
/// medibridge-core never depends on medibridge-infra.
pub struct TurnProcessor<S, T, X, F>
where
    S: ConversationStore,
    T: Transcriber,
    X: Translator,
    F: AudioFingerprinter,
{
    store: S,
    transcriber: T,
    translator: X,
    fingerprinter: F,
    timeouts: TurnTimeouts,
}

impl<S, T, X, F> TurnProcessor<S, T, X, F>
where
    S: ConversationStore,
    T: Transcriber,
    X: Translator,
    F: AudioFingerprinter,
{
    /// Create a processor with the default timeouts.
    pub fn new(store: S, transcriber: T, translator: X, fingerprinter: F) -> Self {
        Self {
            store,
            transcriber,
            translator,
            fingerprinter,
            timeouts: TurnTimeouts::default(),
        }
    }

    /// Override the engine timeouts.
    pub fn with_timeouts(mut self, timeouts: TurnTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Access the conversation store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Process one turn from `role` within `session`.
    ///
    /// The language pair is taken from the session's configuration at the
    /// moment of submission. The audio fingerprint is recorded only after
    /// the message is persisted, so a recording whose turn failed can be
    /// submitted again.
    #[tracing::instrument(
        name = "process_turn",
        skip(self, session, input),
        fields(
            conversation_id = %session.conversation_id(),
            role = %role,
            input = input.kind(),
        )
    )]
    pub async fn process_turn(
        &self,
        session: &mut ConversationSession,
        role: Role,
        input: TurnInput,
    ) -> Result<TurnOutcome, TurnError> {
        let pair = resolve_languages(role, &session.languages());

        let (original_text, fingerprint) = match input {
            TurnInput::Text(text) => {
                if text.trim().is_empty() {
                    return Err(TurnError::EmptyInput);
                }
                (text, None)
            }
            TurnInput::Audio(audio) => {
                let fingerprint = self.fingerprinter.fingerprint(&audio);
                if session.is_duplicate_audio(&fingerprint) {
                    debug!("Recording already processed, skipping");
                    return Ok(TurnOutcome::DuplicateAudio);
                }
                let text = self.transcribe(&audio).await?;
                (text, Some(fingerprint))
            }
        };

        let translated_text = with_timeout(
            self.timeouts.translation,
            self.translator.translate(&original_text, pair),
        )
        .await
        .map_err(|e| {
            warn!(engine = self.translator.name(), error = %e, "Translation failed");
            TurnError::TranslationFailed(e)
        })?;

        let new_message = NewMessage {
            role,
            original_text,
            translated_text,
            input_language: pair.source,
            output_language: pair.target,
        };

        let message = self
            .store
            .append_message(&session.conversation_id(), &new_message)
            .await?;

        session.push_display(DisplayEntry::from(&message));
        if let Some(fingerprint) = fingerprint {
            session.record_audio(fingerprint);
        }

        info!(
            seq = message.seq,
            source = %pair.source,
            target = %pair.target,
            "Turn persisted"
        );
        Ok(TurnOutcome::Completed(message))
    }

    /// Transcribe a recording, treating an empty transcript as a failure.
    async fn transcribe(&self, audio: &[u8]) -> Result<String, TurnError> {
        let text = with_timeout(self.timeouts.transcription, self.transcriber.transcribe(audio))
            .await
            .map_err(|e| {
                warn!(engine = self.transcriber.name(), error = %e, "Transcription failed");
                TurnError::TranscriptionFailed(e)
            })?;

        let text = text.trim();
        if text.is_empty() {
            return Err(TurnError::TranscriptionFailed(EngineError::Response(
                "no speech detected".to_string(),
            )));
        }
        Ok(text.to_string())
    }
}
