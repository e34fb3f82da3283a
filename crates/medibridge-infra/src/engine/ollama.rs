//! OllamaSummaryEngine -- clinical summaries from a locally hosted model.
//!
//! Sends one non-streaming user message to `{base_url}/api/chat` and returns
//! `message.content` from the response.

use std::time::Duration;

use medibridge_core::engine::SummaryEngine;
use medibridge_types::config::SummarizationConfig;
use medibridge_types::error::EngineError;
use serde::{Deserialize, Serialize};

use super::{build_client, check_status, request_error, trim_base_url};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

pub struct OllamaSummaryEngine {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaSummaryEngine {
    pub fn new(config: &SummarizationConfig) -> Result<Self, EngineError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        Ok(Self {
            client: build_client(timeout)?,
            base_url: trim_base_url(&config.base_url),
            model: config.model.clone(),
            timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        }
    }
}

pub(crate) fn parse_chat_response(body: &str) -> Result<String, EngineError> {
    serde_json::from_str::<ChatResponse>(body)
        .map(|r| r.message.content)
        .map_err(|e| EngineError::Response(format!("failed to parse chat response: {e}")))
}

impl SummaryEngine for OllamaSummaryEngine {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, prompt: &str) -> Result<String, EngineError> {
        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&self.request(prompt))
            .send()
            .await
            .map_err(|e| request_error(e, self.timeout))?;

        let body = check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| EngineError::Response(format!("failed to read body: {e}")))?;

        parse_chat_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let engine = OllamaSummaryEngine::new(&SummarizationConfig::default()).unwrap();
        let json = serde_json::to_value(engine.request("Summarize this")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "mistral:latest",
                "messages": [{"role": "user", "content": "Summarize this"}],
                "stream": false
            })
        );
    }

    #[test]
    fn test_parse_chat_response() {
        let body = r#"{
            "model": "mistral:latest",
            "created_at": "2026-01-01T00:00:00Z",
            "message": {"role": "assistant", "content": "- Symptoms: headache"},
            "done": true
        }"#;
        assert_eq!(parse_chat_response(body).unwrap(), "- Symptoms: headache");
    }

    #[test]
    fn test_parse_chat_response_error_body() {
        let err = parse_chat_response(r#"{"error": "model 'mistral' not found"}"#).unwrap_err();
        assert!(matches!(err, EngineError::Response(_)));
    }
}
