//! GoogleTranslator -- translation through Google's public `gtx` endpoint.
//!
//! Calls `{base_url}/translate_a/single?client=gtx&sl=..&tl=..&dt=t&q=..`
//! and concatenates the translated segments found at `json[0][i][0]`.

use std::time::Duration;

use medibridge_core::engine::Translator;
use medibridge_types::config::TranslationConfig;
use medibridge_types::error::EngineError;
use medibridge_types::language::LanguagePair;

use super::{build_client, check_status, request_error, trim_base_url};

pub struct GoogleTranslator {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl GoogleTranslator {
    pub fn new(config: &TranslationConfig) -> Result<Self, EngineError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        Ok(Self {
            client: build_client(timeout)?,
            base_url: trim_base_url(&config.base_url),
            timeout,
        })
    }
}

/// Join the sentence segments of a gtx response.
pub(crate) fn parse_gtx_response(json: &serde_json::Value) -> Result<String, EngineError> {
    let sentences = json
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| EngineError::Response("missing sentence array".to_string()))?;

    let translated: String = sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(|s| s.as_str()))
        .collect();

    if translated.is_empty() {
        return Err(EngineError::Response("empty translation".to_string()));
    }
    Ok(translated)
}

impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(&self, text: &str, pair: LanguagePair) -> Result<String, EngineError> {
        if pair.source == pair.target || text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let url = format!("{}/translate_a/single", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", pair.source.code()),
                ("tl", pair.target.code()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| request_error(e, self.timeout))?;

        let json: serde_json::Value = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| EngineError::Response(format!("failed to parse translation: {e}")))?;

        parse_gtx_response(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medibridge_types::language::Language;
    use serde_json::json;

    #[test]
    fn test_parse_joins_segments() {
        let body = json!([
            [
                ["I have a headache. ", "Mujhe sir dard hai. ", null, null, 10],
                ["Since yesterday.", "Kal se.", null, null, 10]
            ],
            null,
            "hi"
        ]);
        assert_eq!(
            parse_gtx_response(&body).unwrap(),
            "I have a headache. Since yesterday."
        );
    }

    #[test]
    fn test_parse_rejects_unexpected_shape() {
        let err = parse_gtx_response(&json!({"error": "quota"})).unwrap_err();
        assert!(matches!(err, EngineError::Response(_)));
    }

    #[test]
    fn test_parse_rejects_empty_translation() {
        let err = parse_gtx_response(&json!([[], null, "en"])).unwrap_err();
        assert!(matches!(err, EngineError::Response(_)));
    }

    #[tokio::test]
    async fn test_same_language_skips_request() {
        // Unroutable base URL: any network call would fail.
        let translator = GoogleTranslator::new(&TranslationConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 1,
        })
        .unwrap();
        let pair = LanguagePair {
            source: Language::German,
            target: Language::German,
        };
        assert_eq!(translator.translate("Guten Tag", pair).await.unwrap(), "Guten Tag");
    }

    #[tokio::test]
    async fn test_blank_text_skips_request() {
        let translator = GoogleTranslator::new(&TranslationConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 1,
        })
        .unwrap();
        let pair = LanguagePair {
            source: Language::English,
            target: Language::Hindi,
        };
        assert_eq!(translator.translate("  ", pair).await.unwrap(), "  ");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_request_error() {
        let translator = GoogleTranslator::new(&TranslationConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
        })
        .unwrap();
        let pair = LanguagePair {
            source: Language::English,
            target: Language::Hindi,
        };
        let err = translator.translate("Hello", pair).await.unwrap_err();
        assert!(matches!(err, EngineError::Request(_) | EngineError::Timeout(_)));
    }
}
