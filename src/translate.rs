//! # Translator — Krio → English Collaborator
//!
//! The resolver's second step hands likely-Krio text to a [`Translator`]
//! and scans the English result for symptom keywords. The engine never
//! depends on a concrete implementation:
//!
//! | Implementation | Used when |
//! |----------------|-----------|
//! | [`HttpTranslator`] | `KAI_TRANSLATION_API_HOST` is set |
//! | [`DisabledTranslator`] | otherwise; every call fails with [`TranslationError::Disabled`] |
//!
//! ## Wire Format
//!
//! ```text
//! POST {host}/api/v1/translate
//! X-API-Key: {key}
//! { "text": "...", "source_lang": "kri", "target_lang": "en" }
//!
//! 200 → first non-empty of translated_text | translation | english_text | text
//!       (or the body itself when it is a bare JSON string)
//! ```
//!
//! Every failure is local: the resolver logs it and moves on to its
//! keyword scan. Nothing here is ever shown to the user.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::Language;

/// Response fields that may carry the translated text, in priority order.
const RESPONSE_FIELDS: [&str; 4] = ["translated_text", "translation", "english_text", "text"];

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation is not configured")]
    Disabled,
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("translation service returned status {0}")]
    Status(u16),
    #[error("translation service returned no text")]
    EmptyResponse,
}

/// Translates text between two languages.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslationError>;
}

/// Translator used when no translation service is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledTranslator;

#[async_trait]
impl Translator for DisabledTranslator {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn translate(&self, _: &str, _: Language, _: Language) -> Result<String, TranslationError> {
        Err(TranslationError::Disabled)
    }
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    source_lang: &'a str,
    target_lang: &'a str,
}

/// Client for the external translation API.
pub struct HttpTranslator {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpTranslator {
    /// Builds a client whose every request is bounded by `timeout`.
    pub fn new(host: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self, TranslationError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/api/v1/translate", host.trim_end_matches('/')),
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    fn name(&self) -> &str {
        "http"
    }

    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslationError> {
        let body = TranslateRequest {
            text,
            source_lang: source.code(),
            target_lang: target.code(),
        };
        let response = self
            .http
            .post(&self.endpoint)
            .header("X-API-Key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::Status(status.as_u16()));
        }

        let payload: Value = response.json().await?;
        let translated = extract_translation(&payload).ok_or(TranslationError::EmptyResponse)?;
        tracing::debug!(
            source = %source,
            target = %target,
            original_len = text.len(),
            translated_len = translated.len(),
            "Translation completed"
        );
        Ok(translated)
    }
}

/// Pulls the translated text out of a response body.
pub fn extract_translation(payload: &Value) -> Option<String> {
    let candidate = match payload {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => RESPONSE_FIELDS
            .iter()
            .filter_map(|field| map.get(*field).and_then(Value::as_str))
            .find(|s| !s.trim().is_empty()),
        _ => None,
    }?;
    let trimmed = candidate.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Test doubles shared by the resolver and engine tests.
#[cfg(test)]
pub(crate) mod stub {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    /// Answers every call with a fixed text (or error) after an optional delay.
    pub struct StubTranslator {
        reply: Option<String>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl StubTranslator {
        pub fn replying(text: &str) -> Self {
            Self { reply: Some(text.to_string()), delay: Duration::ZERO, calls: AtomicUsize::new(0) }
        }

        pub fn failing() -> Self {
            Self { reply: None, delay: Duration::ZERO, calls: AtomicUsize::new(0) }
        }

        pub fn slow(text: &str, delay: Duration) -> Self {
            Self { reply: Some(text.to_string()), delay, calls: AtomicUsize::new(0) }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Translator for StubTranslator {
        fn name(&self) -> &str {
            "stub"
        }

        async fn translate(&self, _: &str, _: Language, _: Language) -> Result<String, TranslationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.reply.clone().ok_or(TranslationError::Status(503))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn extracts_first_non_empty_field() {
        assert_eq!(
            extract_translation(&json!({"translated_text": "My head hurts"})).as_deref(),
            Some("My head hurts")
        );
        assert_eq!(
            extract_translation(&json!({"translated_text": "  ", "english_text": "fever"})).as_deref(),
            Some("fever")
        );
        assert_eq!(extract_translation(&json!({"text": "cough"})).as_deref(), Some("cough"));
    }

    #[test]
    fn accepts_bare_string_body() {
        assert_eq!(extract_translation(&json!("I am sick")).as_deref(), Some("I am sick"));
    }

    #[test]
    fn empty_or_unknown_shapes_yield_nothing() {
        assert!(extract_translation(&json!({})).is_none());
        assert!(extract_translation(&json!({"result": "x"})).is_none());
        assert!(extract_translation(&json!("")).is_none());
        assert!(extract_translation(&json!([1, 2])).is_none());
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let t = HttpTranslator::new("http://localhost:9000/", "key", Duration::from_secs(8)).unwrap();
        assert_eq!(t.endpoint(), "http://localhost:9000/api/v1/translate");
    }

    #[tokio::test]
    async fn disabled_translator_always_fails() {
        let err = DisabledTranslator
            .translate("mi ed de wori", Language::Krio, Language::English)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslationError::Disabled));
    }
}
