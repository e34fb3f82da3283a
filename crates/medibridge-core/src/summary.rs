//! Clinical summarizer for stored conversations.
//!
//! `ClinicalSummarizer` reads a conversation's message log through the
//! store, formats it as a transcript, and asks the summary engine for a
//! clinical note. It never writes to the store.

use std::time::Duration;

use medibridge_types::conversation::Message;
use medibridge_types::error::SummaryError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::conversation::repository::ConversationStore;
use crate::engine::{with_timeout, SummaryEngine};

/// Returned instead of calling the engine when a conversation has no messages.
pub const NO_MESSAGES_RESULT: &str = "No messages found in this conversation.";

const CLINICAL_PROMPT_HEADER: &str = r#"You are a medical assistant.

Summarize the following doctor-patient conversation.
Extract and clearly list:
- Symptoms
- Diagnosis (if any)
- Medications
- Follow-up instructions

Be concise and factual. Do NOT hallucinate.

Conversation:
"#;

/// Render messages as `"{role}: {original_text}"` lines, oldest first.
pub fn format_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role, m.original_text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Embed a transcript verbatim in the clinical summary prompt.
pub fn build_prompt(transcript: &str) -> String {
    format!("{CLINICAL_PROMPT_HEADER}{transcript}\n")
}

/// Summarizes conversations with a summary engine.
pub struct ClinicalSummarizer<S, E>
where
    S: ConversationStore,
    E: SummaryEngine,
{
    store: S,
    engine: E,
    timeout: Duration,
}

impl<S, E> ClinicalSummarizer<S, E>
where
    S: ConversationStore,
    E: SummaryEngine,
{
    pub fn new(store: S, engine: E, timeout: Duration) -> Self {
        Self {
            store,
            engine,
            timeout,
        }
    }

    /// Summarize a conversation.
    ///
    /// An unknown id or an empty conversation yields [`NO_MESSAGES_RESULT`]
    /// without invoking the engine. The engine's response is returned
    /// unmodified.
    #[tracing::instrument(
        name = "summarize_conversation",
        skip(self),
        fields(engine = self.engine.name())
    )]
    pub async fn summarize(&self, conversation_id: &Uuid) -> Result<String, SummaryError> {
        let messages = self.store.load_messages(conversation_id).await?;
        if messages.is_empty() {
            info!("No messages to summarize");
            return Ok(NO_MESSAGES_RESULT.to_string());
        }

        let prompt = build_prompt(&format_transcript(&messages));
        let summary = with_timeout(self.timeout, self.engine.complete(&prompt))
            .await
            .map_err(|e| {
                warn!(error = %e, "Summarization failed");
                SummaryError::SummarizationFailed(e)
            })?;

        info!(message_count = messages.len(), "Conversation summarized");
        Ok(summary)
    }
}
