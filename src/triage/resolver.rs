//! # Symptom Resolver — From Free Text to a Symptom Key
//!
//! Resolution is a strict fall-through, stopping at the first step that
//! produces a match:
//!
//! ```text
//! text
//!   ├── (empty) ─────────────────────────────────────► UNMATCHED
//!   ├── 1. fuzzy candidates, best one ≥ 0.7 ─────────► FUZZY
//!   ├── 2. likely Krio? translate (bounded) and scan ► TRANSLATED_FALLBACK
//!   ├── 3. keyword scan over the original text ──────► EXACT_KEYWORD
//!   └── 4. ──────────────────────────────────────────► UNMATCHED
//! ```
//!
//! Step 2 runs when the language hint says Krio, or when there is no hint
//! and [`is_likely_krio`] fires. A failed, slow or disabled translation is
//! logged and skipped; it never reaches the caller.
//!
//! Keyword scans check variant phrases in lexicon order, then the raw keys
//! with `_` read as spaces (`difficulty_breathing` → `difficulty breathing`).

use std::sync::Arc;
use std::time::Duration;

use crate::core::{Language, Lexicon, MatchSource, SymptomMatch};
use crate::nlu::fuzzy::FuzzyMatcher;
use crate::nlu::krio::is_likely_krio;
use crate::nlu::{contains_phrase, normalize};
use crate::translate::Translator;

/// Confidence given to keyword-scan hits (steps 2 and 3).
pub const KEYWORD_SCAN_CONFIDENCE: f64 = 0.8;

/// Default bound on one translation call.
pub const DEFAULT_TRANSLATION_TIMEOUT: Duration = Duration::from_secs(8);

pub struct SymptomResolver {
    lexicon: Arc<Lexicon>,
    matcher: FuzzyMatcher,
    translator: Arc<dyn Translator>,
    timeout: Duration,
}

impl SymptomResolver {
    pub fn new(lexicon: Arc<Lexicon>, translator: Arc<dyn Translator>, timeout: Duration) -> Self {
        Self {
            matcher: FuzzyMatcher::new(lexicon.clone()),
            lexicon,
            translator,
            timeout,
        }
    }

    pub fn matcher(&self) -> &FuzzyMatcher {
        &self.matcher
    }

    /// Resolves a message to a symptom. Always returns a value.
    pub async fn resolve(&self, text: &str, hint: Option<Language>) -> SymptomMatch {
        if text.trim().is_empty() {
            return SymptomMatch::unmatched();
        }

        if let Some(found) = self.matcher.best_candidate(text) {
            tracing::debug!(key = ?found.key(), confidence = found.confidence, "Fuzzy match");
            return found;
        }

        if self.wants_translation(text, hint) {
            if let Some(english) = self.translate_bounded(text).await {
                if let Some(found) = self.keyword_scan(&english, MatchSource::TranslatedFallback) {
                    tracing::debug!(key = ?found.key(), translated = %english, "Matched via translation");
                    return found;
                }
            }
        }

        if let Some(found) = self.keyword_scan(text, MatchSource::ExactKeyword) {
            tracing::debug!(key = ?found.key(), "Keyword match");
            return found;
        }

        SymptomMatch::unmatched()
    }

    fn wants_translation(&self, text: &str, hint: Option<Language>) -> bool {
        match hint {
            Some(Language::Krio) => true,
            Some(Language::English) => false,
            None => is_likely_krio(text),
        }
    }

    /// Krio → English translation bounded by the configured timeout.
    async fn translate_bounded(&self, text: &str) -> Option<String> {
        let call = self.translator.translate(text, Language::Krio, Language::English);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(english)) => Some(english),
            Ok(Err(e)) => {
                tracing::warn!(translator = self.translator.name(), error = %e, "Translation failed, falling back to keyword scan");
                None
            }
            Err(_) => {
                tracing::warn!(
                    translator = self.translator.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Translation timed out, falling back to keyword scan"
                );
                None
            }
        }
    }

    /// First variant phrase, then first raw key phrase, contained in the text.
    pub fn keyword_scan(&self, text: &str, source: MatchSource) -> Option<SymptomMatch> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return None;
        }

        if let Some(v) = self
            .lexicon
            .variants()
            .iter()
            .find(|v| contains_phrase(&normalized, &v.phrase))
        {
            return Some(SymptomMatch::new(
                v.symptom_key.clone(),
                KEYWORD_SCAN_CONFIDENCE,
                source,
                v.phrase.clone(),
            ));
        }

        self.lexicon.entries().iter().find_map(|entry| {
            let phrase = entry.key_phrase();
            contains_phrase(&normalized, &phrase).then(|| {
                SymptomMatch::new(entry.key.clone(), KEYWORD_SCAN_CONFIDENCE, source, phrase)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::stub::StubTranslator;
    use crate::translate::DisabledTranslator;

    fn resolver_with(translator: Arc<dyn Translator>) -> SymptomResolver {
        let lexicon = Arc::new(Lexicon::builtin().unwrap());
        SymptomResolver::new(lexicon, translator, Duration::from_millis(200))
    }

    fn resolver() -> SymptomResolver {
        resolver_with(Arc::new(DisabledTranslator))
    }

    #[tokio::test]
    async fn english_sentence_resolves_by_fuzzy_containment() {
        let m = resolver().resolve("I have a headache", None).await;
        assert_eq!(m.key(), Some("headache"));
        assert_eq!(m.source, MatchSource::Fuzzy);
        assert_eq!(m.confidence, 0.8);
    }

    #[tokio::test]
    async fn krio_variant_resolves_with_full_confidence() {
        let m = resolver().resolve("mi ed de wori", None).await;
        assert_eq!(m.key(), Some("headache"));
        assert!(m.confidence >= 0.7);
    }

    #[tokio::test]
    async fn empty_text_is_unmatched_without_translation() {
        let stub = Arc::new(StubTranslator::replying("fever"));
        let r = resolver_with(stub.clone());
        for text in ["", "   ", "\n\t"] {
            assert!(r.resolve(text, Some(Language::Krio)).await.is_unmatched());
        }
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn krio_text_falls_back_to_translation() {
        let stub = Arc::new(StubTranslator::replying("My child is very sick with fever"));
        let m = resolver_with(stub.clone()).resolve("mi pikin sik bad bad", None).await;
        assert_eq!(m.key(), Some("mild_fever"));
        assert_eq!(m.source, MatchSource::TranslatedFallback);
        assert_eq!(m.confidence, KEYWORD_SCAN_CONFIDENCE);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn translation_failure_is_swallowed() {
        let stub = Arc::new(StubTranslator::failing());
        let m = resolver_with(stub.clone()).resolve("mi pikin sik bad bad", None).await;
        assert!(m.is_unmatched());
        assert_eq!(m.source, MatchSource::Unmatched);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn slow_translation_is_cut_off_by_timeout() {
        let stub = Arc::new(StubTranslator::slow("fever", Duration::from_secs(5)));
        let lexicon = Arc::new(Lexicon::builtin().unwrap());
        let r = SymptomResolver::new(lexicon, stub, Duration::from_millis(20));
        let started = std::time::Instant::now();
        let m = r.resolve("mi pikin sik bad bad", None).await;
        assert!(m.is_unmatched());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn english_hint_skips_translation() {
        let stub = Arc::new(StubTranslator::replying("fever"));
        let m = resolver_with(stub.clone())
            .resolve("mi pikin sik bad bad", Some(Language::English))
            .await;
        assert!(m.is_unmatched());
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn english_text_is_not_translated_without_hint() {
        let stub = Arc::new(StubTranslator::replying("fever"));
        let m = resolver_with(stub.clone()).resolve("xyz nonsense text", None).await;
        assert!(m.is_unmatched());
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn raw_key_phrase_is_an_exact_keyword_hit() {
        let m = resolver().resolve("she has difficulty breathing", None).await;
        assert_eq!(m.key(), Some("difficulty_breathing"));
        assert_eq!(m.source, MatchSource::ExactKeyword);
        assert_eq!(m.matched_phrase.as_deref(), Some("difficulty breathing"));
    }

    #[tokio::test]
    async fn emergencies_resolve_by_keyword_scan_only() {
        let r = resolver();
        let m = r.resolve("I can't breathe", None).await;
        assert_eq!(m.key(), Some("difficulty_breathing"));
        assert_eq!(m.source, MatchSource::ExactKeyword);

        let m = r.resolve("my child is shaking", None).await;
        assert_eq!(m.key(), Some("convulsions"));
        assert_eq!(m.matched_phrase.as_deref(), Some("shaking"));

        let m = r.resolve("hi", None).await;
        assert_ne!(m.key(), Some("difficulty_breathing"));
    }

    #[tokio::test]
    async fn resolution_is_deterministic() {
        let r = resolver();
        for text in ["mi ed de wori ɛn mi bele de pen", "I can't breathe", "xyz nonsense text"] {
            let first = r.resolve(text, None).await;
            for _ in 0..5 {
                assert_eq!(r.resolve(text, None).await, first);
            }
        }
    }

    #[test]
    fn keyword_scan_prefers_variants_over_keys() {
        let r = resolver();
        let m = r
            .keyword_scan("Severe vomiting since morning", MatchSource::ExactKeyword)
            .unwrap();
        // "vomiting" is a variant of mild_vomiting; "severe vomiting" is only a key
        assert_eq!(m.key(), Some("mild_vomiting"));
        assert!(r.keyword_scan("", MatchSource::ExactKeyword).is_none());
    }
}
